use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::analyses;
use crate::api::{AnalysisId, AnalysisRecord};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = analyses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AnalysisRow {
    pub id: Uuid,
    pub seq: i64,
    pub text: String,
    pub score: i32,
    pub created_at: DateTime<Utc>,
}

/// Insert payload. `seq` comes from the BIGSERIAL default and `created_at`
/// from the statement clock, so neither is set here.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = analyses)]
pub struct NewAnalysisRow<'a> {
    pub id: Uuid,
    pub text: &'a str,
    pub score: i32,
}

impl From<AnalysisRow> for AnalysisRecord {
    fn from(row: AnalysisRow) -> Self {
        AnalysisRecord {
            id: AnalysisId(row.id),
            text: row.text,
            score: row.score,
            created_at: row.created_at,
            seq: row.seq,
        }
    }
}
