//! Weekly-board contracts: week resolution, day replacement, block removal.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use foyer_shared::schedule::{TimeBlock, UserSchedule};
use foyer_shared::week::{self, WeekContext};
use foyer_shared::{DayOfWeek, UserId, WeekKey};
use foyer_store::Database;

use crate::error::ApiError;
use crate::handlers::SuccessResponse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDto {
    #[serde(default)]
    pub id: Option<String>,
    /// `HH:MM`, absent for all-day blocks.
    #[serde(default)]
    pub start: Option<String>,
    /// `HH:MM`, absent for all-day blocks.
    #[serde(default)]
    pub end: Option<String>,
    pub label: String,
    #[serde(default)]
    pub all_day: bool,
}

impl BlockDto {
    fn from_block(block: &TimeBlock) -> Self {
        Self {
            id: block.id.map(|id| id.to_string()),
            start: block.start.map(|t| t.format("%H:%M").to_string()),
            end: block.end.map(|t| t.format("%H:%M").to_string()),
            label: block.label.clone(),
            all_day: block.all_day,
        }
    }

    fn into_block(self) -> Result<TimeBlock, ApiError> {
        let id = self
            .id
            .map(|raw| {
                Uuid::parse_str(&raw)
                    .map_err(|_| ApiError::BadRequest(format!("invalid block id: {raw}")))
            })
            .transpose()?;
        let start = self.start.map(|raw| parse_time(&raw)).transpose()?;
        let end = self.end.map(|raw| parse_time(&raw)).transpose()?;
        Ok(TimeBlock {
            id,
            start,
            end,
            label: self.label,
            all_day: self.all_day,
        })
    }
}

/// Day-name-keyed week map, Monday first.
pub type UserScheduleDto = BTreeMap<String, Vec<BlockDto>>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekContextDto {
    pub week_key: String,
    pub week_start: String,
    pub week_end: String,
    pub is_current_week: bool,
}

impl From<WeekContext> for WeekContextDto {
    fn from(ctx: WeekContext) -> Self {
        Self {
            week_key: ctx.week_key.to_string(),
            week_start: ctx.week_start.format("%Y-%m-%d").to_string(),
            week_end: ctx.week_end.format("%Y-%m-%d").to_string(),
            is_current_week: ctx.is_current_week,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetWeekQuery {
    pub user_id: i64,
    pub week_key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetWeekAllQuery {
    pub week_key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceDayRequest {
    pub user_id: i64,
    pub week_key: String,
    pub day: String,
    pub blocks: Vec<BlockDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBlockRequest {
    pub user_id: i64,
    pub week_key: String,
    pub day: String,
    pub block_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekContextQuery {
    /// `YYYY-MM-DD`; defaults to the current UTC date.
    #[serde(default)]
    pub date: Option<String>,
    /// Whole weeks to shift the resolved date by (prev/next navigation).
    #[serde(default)]
    pub offset: Option<i64>,
}

fn parse_week_key(raw: &str) -> Result<WeekKey, ApiError> {
    WeekKey::parse(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
}

fn parse_day(raw: &str) -> Result<DayOfWeek, ApiError> {
    DayOfWeek::parse(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
}

fn parse_time(raw: &str) -> Result<NaiveTime, ApiError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| ApiError::BadRequest(format!("invalid time: {raw}")))
}

fn schedule_to_dto(schedule: &UserSchedule) -> UserScheduleDto {
    schedule
        .days()
        .map(|(day, blocks)| {
            (
                day.as_str().to_string(),
                blocks.iter().map(BlockDto::from_block).collect(),
            )
        })
        .collect()
}

pub fn get_week(db: &Database, query: GetWeekQuery) -> Result<UserScheduleDto, ApiError> {
    let week_key = parse_week_key(&query.week_key)?;
    let schedule = db.get_week(UserId(query.user_id), &week_key)?;
    Ok(schedule_to_dto(&schedule))
}

/// The whole household's week, keyed by user id.
pub fn get_week_all(
    db: &Database,
    query: GetWeekAllQuery,
) -> Result<BTreeMap<i64, UserScheduleDto>, ApiError> {
    let week_key = parse_week_key(&query.week_key)?;
    let schedules = db.get_week_all(&week_key)?;
    Ok(schedules
        .iter()
        .map(|(user_id, schedule)| (user_id.0, schedule_to_dto(schedule)))
        .collect())
}

pub fn replace_day(db: &mut Database, req: ReplaceDayRequest) -> Result<UserScheduleDto, ApiError> {
    let week_key = parse_week_key(&req.week_key)?;
    let day = parse_day(&req.day)?;
    let blocks = req
        .blocks
        .into_iter()
        .map(BlockDto::into_block)
        .collect::<Result<Vec<_>, _>>()?;

    let schedule = db.replace_day(UserId(req.user_id), &week_key, day, &blocks)?;
    info!(user = req.user_id, week = %week_key, day = %day, "day replaced");
    Ok(schedule_to_dto(&schedule))
}

pub fn delete_block(db: &Database, req: DeleteBlockRequest) -> Result<SuccessResponse, ApiError> {
    let week_key = parse_week_key(&req.week_key)?;
    let day = parse_day(&req.day)?;
    let block_id = Uuid::parse_str(&req.block_id)
        .map_err(|_| ApiError::BadRequest(format!("invalid block id: {}", req.block_id)))?;

    let success = db.delete_block(UserId(req.user_id), &week_key, day, block_id)?;
    Ok(SuccessResponse { success })
}

/// Resolve a week for the board header; `offset` shifts by whole weeks for
/// prev/next navigation.
pub fn week_context(query: WeekContextQuery) -> Result<WeekContextDto, ApiError> {
    let base = match query.date {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map_err(|_| ApiError::BadRequest(format!("invalid date: {raw}")))?,
        None => Utc::now().date_naive(),
    };
    let target = base + Duration::weeks(query.offset.unwrap_or(0));
    Ok(WeekContextDto::from(week::resolve(target)))
}
