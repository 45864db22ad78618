use crate::responses::repo::SurveyFields;

/// Fills one internal field from an external CSV cell.
pub type ColumnSetter = fn(&mut SurveyFields, String);

/// Header-to-field table for the survey tool's semicolon-CSV export.
///
/// The header strings are the verbatim question texts of the export
/// template; the import control flow never names a column inline, so the
/// mapping can change without touching it. `Q012[SQ001]` feeds both
/// `social_media_usage` and `info_source_social`, matching the upstream
/// dashboard's treatment of that question.
pub const IMPORT_COLUMNS: &[(&str, ColumnSetter)] = &[
    ("Q00. In welchem Kiez wohnen Sie?", |r, v| {
        r.location = Some(v)
    }),
    ("Q001. Wie alt sind Sie?", |r, v| r.age_group = Some(v)),
    (
        "Q002. Wie viele Personen leben (inkl. Ihnen) in Ihrem Haushalt?",
        |r, v| r.household_size = Some(v),
    ),
    (
        "Q003. Wie zufrieden sind Sie mit dem Leben in Ihrem Kiez?",
        |r, v| r.satisfaction = Some(v),
    ),
    (
        "Q005. Wie blicken Sie in die Zukunft Ihres Kiezes?",
        |r, v| r.future_outlook = Some(v),
    ),
    (
        "Q004[SQ001]. Welche Themen beschäftigen Sie aktuell am meisten? [Wohnen / Mieten]",
        |r, v| r.topics_housing = Some(v),
    ),
    (
        "Q004[SQ002]. Welche Themen beschäftigen Sie aktuell am meisten? [Sicherheit]",
        |r, v| r.topics_security = Some(v),
    ),
    (
        "Q004[SQ003]. Welche Themen beschäftigen Sie aktuell am meisten? [Bildung / Schule]",
        |r, v| r.topics_education = Some(v),
    ),
    (
        "Q004[SQ004]. Welche Themen beschäftigen Sie aktuell am meisten? [Verkehr]",
        |r, v| r.topics_traffic = Some(v),
    ),
    (
        "Q004[SQ005]. Welche Themen beschäftigen Sie aktuell am meisten? [Umwelt]",
        |r, v| r.topics_environment = Some(v),
    ),
    (
        "Q004[SQ006]. Welche Themen beschäftigen Sie aktuell am meisten? [Nachbarschaftliches Miteinander]",
        |r, v| r.topics_community = Some(v),
    ),
    (
        "Q012[SQ001]. Wie informieren Sie sich über aktuelle Entwicklungen im Bezirk? [Soziale Medien]",
        |r, v| r.social_media_usage = Some(v),
    ),
    (
        "Q013[SQ001]. Welche sozialen Medien nutzen Sie? [Facebook]",
        |r, v| r.facebook = Some(v),
    ),
    (
        "Q013[SQ002]. Welche sozialen Medien nutzen Sie? [Instagram]",
        |r, v| r.instagram = Some(v),
    ),
    (
        "Q013[SQ003]. Welche sozialen Medien nutzen Sie? [TikTok]",
        |r, v| r.tiktok = Some(v),
    ),
    (
        "Q013[SQ004]. Welche sozialen Medien nutzen Sie? [YouTube]",
        |r, v| r.youtube = Some(v),
    ),
    (
        "Q013[SQ005]. Welche sozialen Medien nutzen Sie? [WhatsApp]",
        |r, v| r.whatsapp = Some(v),
    ),
    (
        "Q012[SQ001]. Wie informieren Sie sich über aktuelle Entwicklungen im Bezirk? [Soziale Medien]",
        |r, v| r.info_source_social = Some(v),
    ),
    (
        "Q012[SQ003]. Wie informieren Sie sich über aktuelle Entwicklungen im Bezirk? [Zeitung/Print-Medien]",
        |r, v| r.info_source_print = Some(v),
    ),
    (
        "Q012[SQ004]. Wie informieren Sie sich über aktuelle Entwicklungen im Bezirk? [Fernsehen/TV]",
        |r, v| r.info_source_tv = Some(v),
    ),
    (
        "Q012[SQ006]. Wie informieren Sie sich über aktuelle Entwicklungen im Bezirk? [Newsletter]",
        |r, v| r.info_source_newsletter = Some(v),
    ),
    (
        "Q012[SQ007]. Wie informieren Sie sich über aktuelle Entwicklungen im Bezirk? [Informationsveranstaltung]",
        |r, v| r.info_source_events = Some(v),
    ),
    (
        "Q007. Wie stark fühlen Sie sich im Bezirk politisch vertreten?",
        |r, v| r.political_representation = Some(v),
    ),
    (
        "Q011. Haben Sie schon einmal etwas von den \"Kiezmachern\" gehört?",
        |r, v| r.kiezmacher_known = Some(v),
    ),
    (
        "Q009. Würden Sie sich gerne stärker bei lokalen Themen einbringen?",
        |r, v| r.engagement_wish = Some(v),
    ),
    (
        "Q010. Was wünschen Sie sich für die Zukunft in Ihrem Kiez?",
        |r, v| r.future_wishes = Some(v),
    ),
];

/// Column order for CSV export: identifier, the full answer schema in
/// declaration order, provenance last.
pub const EXPORT_COLUMNS: &[&str] = &[
    "id",
    "location",
    "age_group",
    "household_size",
    "satisfaction",
    "future_outlook",
    "topics_housing",
    "topics_security",
    "topics_education",
    "topics_traffic",
    "topics_environment",
    "topics_community",
    "social_media_usage",
    "facebook",
    "instagram",
    "tiktok",
    "youtube",
    "whatsapp",
    "info_source_social",
    "info_source_print",
    "info_source_tv",
    "info_source_newsletter",
    "info_source_events",
    "political_representation",
    "kiezmacher_known",
    "engagement_wish",
    "future_wishes",
    "created_at",
    "created_by",
    "updated_at",
    "updated_by",
    "import_source",
];
