//! The `entity_ids` field: a comma-separated list of entity ids.
//!
//! Order and duplicates are preserved. Tokens that are not a valid
//! non-negative integer are dropped one by one, never failing the list.

use super::QueryValue;

/// Identifier of an organizational entity (group, division, or facility).
pub type EntityId = u64;

/// Parse `"1, 2, 3"` into `[1, 2, 3]`.
///
/// Each token is trimmed and must parse in full; `None` and `""` yield an
/// empty list.
pub fn parse_entity_ids<'a>(raw: impl Into<Option<&'a str>>) -> Vec<EntityId> {
    let Some(raw) = raw.into() else {
        return Vec::new();
    };
    if raw.is_empty() {
        return Vec::new();
    }

    raw.split(',')
        .filter_map(|token| {
            let parsed = parse_token(token);
            if parsed.is_none() {
                log::debug!("Dropping invalid entity id token '{}'", token);
            }
            parsed
        })
        .collect()
}

/// Join the valid ids with `,`. Invalid entries are skipped.
pub fn stringify_entity_ids<I>(ids: I) -> String
where
    I: IntoIterator,
    I::Item: EntityIdCandidate,
{
    ids.into_iter()
        .filter_map(|id| id.to_entity_id())
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_token(token: &str) -> Option<EntityId> {
    token.trim().parse::<EntityId>().ok()
}

/// Anything that may or may not hold a usable entity id.
pub trait EntityIdCandidate {
    fn to_entity_id(&self) -> Option<EntityId>;
}

impl<T: EntityIdCandidate + ?Sized> EntityIdCandidate for &T {
    fn to_entity_id(&self) -> Option<EntityId> {
        (**self).to_entity_id()
    }
}

impl EntityIdCandidate for u64 {
    fn to_entity_id(&self) -> Option<EntityId> {
        Some(*self)
    }
}

impl EntityIdCandidate for u32 {
    fn to_entity_id(&self) -> Option<EntityId> {
        Some(EntityId::from(*self))
    }
}

impl EntityIdCandidate for i64 {
    fn to_entity_id(&self) -> Option<EntityId> {
        EntityId::try_from(*self).ok()
    }
}

impl EntityIdCandidate for i32 {
    fn to_entity_id(&self) -> Option<EntityId> {
        EntityId::try_from(*self).ok()
    }
}

impl EntityIdCandidate for f64 {
    fn to_entity_id(&self) -> Option<EntityId> {
        let value = *self;
        // u64::MAX rounds up to 2^64 as a float, so the bound is exclusive
        if value.is_finite() && value.fract() == 0.0 && value >= 0.0 && value < u64::MAX as f64 {
            Some(value as EntityId)
        } else {
            None
        }
    }
}

impl EntityIdCandidate for str {
    fn to_entity_id(&self) -> Option<EntityId> {
        parse_token(self)
    }
}

impl EntityIdCandidate for String {
    fn to_entity_id(&self) -> Option<EntityId> {
        parse_token(self)
    }
}

impl EntityIdCandidate for QueryValue {
    fn to_entity_id(&self) -> Option<EntityId> {
        match self {
            QueryValue::Str(s) => parse_token(s),
            QueryValue::Int(n) => n.to_entity_id(),
            QueryValue::Float(f) => f.to_entity_id(),
            QueryValue::Bool(_) | QueryValue::Null | QueryValue::Undefined => None,
        }
    }
}
