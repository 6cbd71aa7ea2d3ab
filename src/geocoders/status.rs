//! Provider status codes and their mapping onto error kinds.
//!
//! Every provider reports success or failure through one JSON field
//! (`status` or `infocode`). The tables below are flat: the first matching
//! row wins, and anything unmatched is a query error.

use super::types::{ErrorKind, GeocoderError};
use serde_json::Value;

/// How a table row recognises a status value.
#[derive(Debug, Clone, Copy)]
pub enum StatusMatch {
    /// JSON integer only.
    Int(i64),
    /// JSON string only. `x` and `*` match any single digit.
    Text(&'static str),
    /// Integer or string carrying the same digits. `x` and `*` are wildcards.
    Either(&'static str),
}

/// What a matched row means.
#[derive(Debug, Clone, Copy)]
pub enum Outcome {
    /// Success, or success with no results.
    Ok,
    Fail(ErrorKind, &'static str),
}

pub type StatusTable = [(StatusMatch, Outcome)];

use ErrorKind::{AuthenticationFailure as Auth, Query, QuotaExceeded as Quota};
use Outcome::{Fail, Ok as Pass};
use StatusMatch::{Either, Int, Text};

pub const BAIDU: &StatusTable = &[
    (Either("0"), Pass),
    (Either("1"), Fail(Query, "Internal server error.")),
    (Either("2"), Fail(Query, "Invalid request.")),
    (Either("3"), Fail(Auth, "Authentication failure.")),
    (Either("4"), Fail(Quota, "Quota validate failure.")),
    (Either("5"), Fail(Query, "AK Illegal or Not Exist.")),
    (Either("101"), Fail(Query, "Your request was denied.")),
    (Either("102"), Fail(Query, "IP/SN/SCODE/REFERER Illegal.")),
    (Either("2xx"), Fail(Query, "Has No Privileges.")),
    (Either("3xx"), Fail(Quota, "Quota Error.")),
];

pub const GAODE: &StatusTable = &[
    (Text("10000"), Pass),
    (Text("10001"), Fail(Auth, "Invalid user key.")),
    (Text("10002"), Fail(Auth, "Service not available.")),
    (Text("10003"), Fail(Quota, "Daily query over limit.")),
    (Text("10004"), Fail(Quota, "Access too frequent.")),
    (Text("10005"), Fail(Query, "Invalid user IP.")),
    (Text("10006"), Fail(Query, "Invalid user domain.")),
    (Text("10007"), Fail(Query, "Invalid user signature.")),
    (Text("10008"), Fail(Query, "Invalid user scode.")),
    (Text("10009"), Fail(Quota, "Userkey plat nomatch.")),
    (Text("10010"), Fail(Quota, "IP query over limit.")),
    (Text("10011"), Fail(Quota, "Not support https.")),
    (Text("10012"), Fail(Quota, "Insufficient privileges.")),
    (Text("10013"), Fail(Quota, "User key recycled.")),
    (Text("10014"), Fail(Quota, "QPS has exceeded the limit.")),
    (Text("10015"), Fail(Quota, "Gateway timeout.")),
    (Text("10016"), Fail(Quota, "Server is busy.")),
    (Text("10017"), Fail(Quota, "Resource unavailable.")),
    (Text("20000"), Fail(Quota, "Invalid params.")),
    (Text("20001"), Fail(Quota, "Missing required params.")),
    (Text("20002"), Fail(Quota, "Illegal request.")),
    (Text("20003"), Fail(Quota, "Unknown error.")),
    (Text("20800"), Fail(Quota, "Out of service.")),
    (Text("20801"), Fail(Quota, "No roads nearby.")),
    (Text("20802"), Fail(Quota, "Route fail.")),
    (Text("20803"), Fail(Quota, "Over direction range.")),
    (Text("300**"), Fail(Quota, "Engine response data error.")),
];

pub const TENCENT: &StatusTable = &[
    (Int(0), Pass),
    (Int(110), Fail(Query, "请求来源未被授权.")),
    (Int(306), Fail(Query, "请求有护持信息请检查字符串.")),
    (Int(310), Fail(Auth, "请求参数信息有误.")),
    (Int(311), Fail(Quota, "key格式错误.")),
];

/// Validate a provider status value against its table.
///
/// `None` (field absent) and JSON `null` fall through to the generic
/// query error like any other unknown value.
pub fn check_status(table: &StatusTable, status: Option<&Value>) -> Result<(), GeocoderError> {
    let status = status.unwrap_or(&Value::Null);
    let row = table.iter().find(|(matcher, _)| matches(*matcher, status));

    match row {
        Some((_, Outcome::Ok)) => Ok(()),
        Some((_, Outcome::Fail(kind, message))) => Err(GeocoderError::from_kind(*kind, *message)),
        None => Err(GeocoderError::Query(format!("Unknown error (status {})", status))),
    }
}

fn matches(matcher: StatusMatch, status: &Value) -> bool {
    match (matcher, status) {
        (StatusMatch::Int(code), Value::Number(n)) => n.as_i64() == Some(code),
        (StatusMatch::Text(pattern), Value::String(s)) => pattern_matches(pattern, s),
        (StatusMatch::Either(pattern), Value::String(s)) => pattern_matches(pattern, s),
        (StatusMatch::Either(pattern), Value::Number(n)) => match n.as_i64() {
            Some(code) => pattern_matches(pattern, &code.to_string()),
            None => false,
        },
        _ => false,
    }
}

/// Same length, and every position is equal or a wildcard over a digit.
/// The pattern's literal text always matches itself.
fn pattern_matches(pattern: &str, value: &str) -> bool {
    if pattern == value {
        return true;
    }
    if pattern.chars().count() != value.chars().count() {
        return false;
    }
    pattern.chars().zip(value.chars()).all(|(p, v)| match p {
        'x' | '*' => v.is_ascii_digit(),
        _ => p == v,
    })
}
