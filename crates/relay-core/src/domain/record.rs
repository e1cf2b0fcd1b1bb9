//! Outbound record: one row of the outbox, as returned by a claim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::TickOverflow;
use super::ids::RecordId;

/// recipient key が NULL の行に使う ordering group
pub const DEFAULT_RECIPIENT_KEY: &str = "default";

/// 0001-01-01T00:00:00Z から数えた 1970-01-01T00:00:00Z の tick
const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;
const TICKS_PER_SECOND: i64 = 10_000_000;
const NANOS_PER_TICK: u32 = 100;

/// OutboundRecord は claim した outbox の 1 行
///
/// そのまま（camelCase の JSON で）バスへのメッセージ本文になる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundRecord {
    pub id: RecordId,
    pub endpoint: String,
    pub headers: String,
    pub body: String,
    pub recipient_key: String,
    pub created_at: DateTime<Utc>,
}

impl OutboundRecord {
    /// store のカラムから組み立てる
    ///
    /// NULL の文字列カラムは空文字列、NULL の recipient key は
    /// [`DEFAULT_RECIPIENT_KEY`] になる。
    pub fn from_columns(
        id: RecordId,
        endpoint: Option<String>,
        headers: Option<String>,
        body: Option<String>,
        recipient_key: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            endpoint: endpoint.unwrap_or_default(),
            headers: headers.unwrap_or_default(),
            body: body.unwrap_or_default(),
            recipient_key: recipient_key.unwrap_or_else(|| DEFAULT_RECIPIENT_KEY.to_string()),
            created_at,
        }
    }

    /// バスが重複 enqueue をまとめるためのトークン
    pub fn dedup_token(&self) -> Result<DedupToken, TickOverflow> {
        DedupToken::new(self.id, self.created_at)
    }
}

/// DedupToken は `"{id}_{ticks}"`（ticks は 0001-01-01 UTC からの 100ns 単位）
///
/// 既存の producer が同じ行に付けるトークンと一致する形式。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DedupToken(String);

impl DedupToken {
    /// `created_at` が i64 の tick で表せない場合は `TickOverflow`
    pub fn new(id: RecordId, created_at: DateTime<Utc>) -> Result<Self, TickOverflow> {
        let ticks = ticks(created_at).ok_or(TickOverflow(created_at))?;
        Ok(Self(format!("{id}_{ticks}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DedupToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 0001-01-01T00:00:00Z からの 100ns 単位の経過数。i64 に収まらなければ `None`
pub fn ticks(at: DateTime<Utc>) -> Option<i64> {
    at.timestamp()
        .checked_mul(TICKS_PER_SECOND)?
        .checked_add(UNIX_EPOCH_TICKS)?
        .checked_add(i64::from(at.timestamp_subsec_nanos() / NANOS_PER_TICK))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rstest::rstest;

    fn at(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, 0, 0, 0).unwrap()
    }

    fn record(id: i64, created_at: DateTime<Utc>) -> OutboundRecord {
        OutboundRecord::from_columns(
            RecordId::new(id),
            Some("https://example.test/send".into()),
            Some("{}".into()),
            Some("hello".into()),
            Some("+551199999999".into()),
            created_at,
        )
    }

    #[rstest]
    #[case::unix_epoch(at(1970, 1, 1), 621_355_968_000_000_000)]
    #[case::new_year_2024(at(2024, 1, 1), 638_396_640_000_000_000)]
    #[case::first_tick(at(1970, 1, 1) + Duration::nanoseconds(100), 621_355_968_000_000_001)]
    fn ticks_match_dotnet_epoch(#[case] time: DateTime<Utc>, #[case] expected: i64) {
        assert_eq!(ticks(time), Some(expected));
    }

    #[test]
    fn sub_tick_precision_is_truncated() {
        let base = at(2024, 1, 1);
        assert_eq!(ticks(base + Duration::nanoseconds(99)), ticks(base));
    }

    #[test]
    fn dedup_token_format() {
        let r = record(10, at(2024, 1, 1));
        assert_eq!(r.dedup_token().unwrap().as_str(), "10_638396640000000000");
    }

    #[test]
    fn same_record_yields_same_token() {
        let r = record(10, at(2024, 1, 1));
        assert_eq!(r.dedup_token().unwrap(), r.clone().dedup_token().unwrap());
    }

    #[rstest]
    #[case::different_id(record(10, at(2024, 1, 1)), record(11, at(2024, 1, 1)))]
    #[case::different_time(record(10, at(2024, 1, 1)), record(10, at(2024, 1, 2)))]
    #[case::one_tick_apart(
        record(10, at(2024, 1, 1)),
        record(10, at(2024, 1, 1) + Duration::nanoseconds(100))
    )]
    fn distinct_keys_yield_distinct_tokens(#[case] a: OutboundRecord, #[case] b: OutboundRecord) {
        assert_ne!(a.dedup_token().unwrap(), b.dedup_token().unwrap());
    }

    #[test]
    fn far_future_created_at_has_no_token() {
        let created_at = at(40_000, 1, 1);
        assert_eq!(ticks(created_at), None);

        let err = DedupToken::new(RecordId::new(1), created_at).unwrap_err();
        assert_eq!(err.0, created_at);
        assert!(record(1, created_at).dedup_token().is_err());
    }

    #[test]
    fn last_representable_tick_still_has_a_token() {
        // i64::MAX ticks は 29228-09-14 頃
        let created_at = at(29_228, 9, 13);
        assert!(ticks(created_at).is_some());
        assert!(ticks(at(29_229, 1, 1)).is_none());
    }

    #[test]
    fn null_columns_fall_back() {
        let r =
            OutboundRecord::from_columns(RecordId::new(1), None, None, None, None, at(2024, 1, 1));
        assert_eq!(r.endpoint, "");
        assert_eq!(r.headers, "");
        assert_eq!(r.body, "");
        assert_eq!(r.recipient_key, DEFAULT_RECIPIENT_KEY);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(record(10, at(2024, 1, 1))).unwrap();
        assert_eq!(json["id"], 10);
        assert_eq!(json["recipientKey"], "+551199999999");
        assert_eq!(json["createdAt"], "2024-01-01T00:00:00Z");
    }
}
