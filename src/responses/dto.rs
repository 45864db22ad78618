use serde::Serialize;

/// One bucket of the location breakdown.
#[derive(Debug, Serialize)]
pub struct LocationCount {
    pub location: String,
    pub count: i64,
}

/// One bucket of the age-group breakdown.
#[derive(Debug, Serialize)]
pub struct AgeGroupCount {
    pub age_group: String,
    pub count: i64,
}

/// Payload of `GET /api/stats`.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_responses: i64,
    pub location_distribution: Vec<LocationCount>,
    pub age_distribution: Vec<AgeGroupCount>,
}

/// Payload of `GET /api/export-csv`.
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub csv_data: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_serialize_with_the_dashboard_keys() {
        let stats = StatsResponse {
            total_responses: 3,
            location_distribution: vec![LocationCount {
                location: "Mitte".into(),
                count: 2,
            }],
            age_distribution: vec![AgeGroupCount {
                age_group: "18-29".into(),
                count: 3,
            }],
        };
        let json = serde_json::to_value(&stats).expect("serialize stats");
        assert_eq!(json["total_responses"], 3);
        assert_eq!(json["location_distribution"][0]["location"], "Mitte");
        assert_eq!(json["location_distribution"][0]["count"], 2);
        assert_eq!(json["age_distribution"][0]["age_group"], "18-29");
    }
}
