use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// The flat answer set of one survey response. Every question is optional;
/// unanswered questions stay `None` and serialize as `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct SurveyFields {
    pub location: Option<String>,
    pub age_group: Option<String>,
    pub household_size: Option<String>,
    pub satisfaction: Option<String>,
    pub future_outlook: Option<String>,
    pub topics_housing: Option<String>,
    pub topics_security: Option<String>,
    pub topics_education: Option<String>,
    pub topics_traffic: Option<String>,
    pub topics_environment: Option<String>,
    pub topics_community: Option<String>,
    pub social_media_usage: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    pub youtube: Option<String>,
    pub whatsapp: Option<String>,
    pub info_source_social: Option<String>,
    pub info_source_print: Option<String>,
    pub info_source_tv: Option<String>,
    pub info_source_newsletter: Option<String>,
    pub info_source_events: Option<String>,
    pub political_representation: Option<String>,
    pub kiezmacher_known: Option<String>,
    pub engagement_wish: Option<String>,
    pub future_wishes: Option<String>,
}

/// One stored survey response: answers plus provenance.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SurveyResponse {
    pub id: Uuid,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub fields: SurveyFields,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub created_by: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    pub updated_by: Option<String>,
    pub import_source: Option<String>,
}

const ANSWER_COLUMNS: &str = "location, age_group, household_size, satisfaction, future_outlook, \
     topics_housing, topics_security, topics_education, topics_traffic, topics_environment, \
     topics_community, social_media_usage, facebook, instagram, tiktok, youtube, whatsapp, \
     info_source_social, info_source_print, info_source_tv, info_source_newsletter, \
     info_source_events, political_representation, kiezmacher_known, engagement_wish, \
     future_wishes";

macro_rules! bind_answers {
    ($query:expr, $fields:expr) => {
        $query
            .bind(&$fields.location)
            .bind(&$fields.age_group)
            .bind(&$fields.household_size)
            .bind(&$fields.satisfaction)
            .bind(&$fields.future_outlook)
            .bind(&$fields.topics_housing)
            .bind(&$fields.topics_security)
            .bind(&$fields.topics_education)
            .bind(&$fields.topics_traffic)
            .bind(&$fields.topics_environment)
            .bind(&$fields.topics_community)
            .bind(&$fields.social_media_usage)
            .bind(&$fields.facebook)
            .bind(&$fields.instagram)
            .bind(&$fields.tiktok)
            .bind(&$fields.youtube)
            .bind(&$fields.whatsapp)
            .bind(&$fields.info_source_social)
            .bind(&$fields.info_source_print)
            .bind(&$fields.info_source_tv)
            .bind(&$fields.info_source_newsletter)
            .bind(&$fields.info_source_events)
            .bind(&$fields.political_representation)
            .bind(&$fields.kiezmacher_known)
            .bind(&$fields.engagement_wish)
            .bind(&$fields.future_wishes)
    };
}

impl SurveyResponse {
    /// All responses, in insertion order (made explicit: a bare table scan
    /// guarantees nothing, so the practical default is pinned down here).
    pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<SurveyResponse>> {
        let sql = format!(
            "SELECT id, {ANSWER_COLUMNS}, created_at, created_by, updated_at, updated_by, \
             import_source FROM survey_responses ORDER BY created_at, id"
        );
        sqlx::query_as::<_, SurveyResponse>(&sql).fetch_all(db).await
    }

    /// Insert a new response stamped with the acting user; returns the
    /// store-generated identifier.
    pub async fn insert(
        db: &PgPool,
        fields: &SurveyFields,
        created_by: &str,
        import_source: Option<&str>,
    ) -> sqlx::Result<Uuid> {
        let sql = format!(
            "INSERT INTO survey_responses ({ANSWER_COLUMNS}, created_at, created_by, import_source) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
             $18, $19, $20, $21, $22, $23, $24, $25, $26, now(), $27, $28) \
             RETURNING id"
        );
        let row: (Uuid,) = bind_answers!(sqlx::query_as(&sql), fields)
            .bind(created_by)
            .bind(import_source)
            .fetch_one(db)
            .await?;
        Ok(row.0)
    }

    /// Full-record replace of the answer set (not a partial merge); returns
    /// the number of rows touched (0 when the id does not exist).
    pub async fn replace(
        db: &PgPool,
        id: Uuid,
        fields: &SurveyFields,
        updated_by: &str,
    ) -> sqlx::Result<u64> {
        let sql = "UPDATE survey_responses SET \
             location = $2, age_group = $3, household_size = $4, satisfaction = $5, \
             future_outlook = $6, topics_housing = $7, topics_security = $8, \
             topics_education = $9, topics_traffic = $10, topics_environment = $11, \
             topics_community = $12, social_media_usage = $13, facebook = $14, \
             instagram = $15, tiktok = $16, youtube = $17, whatsapp = $18, \
             info_source_social = $19, info_source_print = $20, info_source_tv = $21, \
             info_source_newsletter = $22, info_source_events = $23, \
             political_representation = $24, kiezmacher_known = $25, engagement_wish = $26, \
             future_wishes = $27, updated_at = now(), updated_by = $28 \
             WHERE id = $1";
        let result = bind_answers!(sqlx::query(sql).bind(id), fields)
            .bind(updated_by)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM survey_responses WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}
