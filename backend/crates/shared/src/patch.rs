//! Three-way update field
//!
//! Update DTOs distinguish a field that was left out of the request, a field
//! sent as `null`, and a field sent with a value. `Option<T>` alone cannot
//! tell the first two apart.
//!
//! Fields must be annotated with `#[serde(default)]` so that a missing key
//! deserializes to [`Patch::Absent`].

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Key not present: leave the stored value alone
    Absent,
    /// Explicit `null`: clear the stored value
    Null,
    /// Explicit value: overwrite the stored value
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// Apply to a nullable slot
    pub fn apply_to(self, slot: &mut Option<T>) {
        match self {
            Patch::Absent => {}
            Patch::Null => *slot = None,
            Patch::Value(value) => *slot = Some(value),
        }
    }

    /// Validate or convert the carried value, keeping absent/null as they are
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Patch<U>, E> {
        Ok(match self {
            Patch::Absent => Patch::Absent,
            Patch::Null => Patch::Null,
            Patch::Value(value) => Patch::Value(f(value)?),
        })
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct UpdateRequest {
        #[serde(default)]
        extra_info: Patch<String>,
    }

    #[test]
    fn test_three_way_deserialize() {
        let absent: UpdateRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.extra_info, Patch::Absent);

        let null: UpdateRequest = serde_json::from_str(r#"{"extraInfo":null}"#).unwrap();
        assert_eq!(null.extra_info, Patch::Null);

        let value: UpdateRequest = serde_json::from_str(r#"{"extraInfo":"{}"}"#).unwrap();
        assert_eq!(value.extra_info, Patch::Value("{}".to_string()));
    }

    #[test]
    fn test_apply_to() {
        let mut slot = Some("old".to_string());
        Patch::Absent.apply_to(&mut slot);
        assert_eq!(slot.as_deref(), Some("old"));

        Patch::Value("new".to_string()).apply_to(&mut slot);
        assert_eq!(slot.as_deref(), Some("new"));

        Patch::Null.apply_to(&mut slot);
        assert_eq!(slot, None);
    }

    #[test]
    fn test_try_map() {
        let patch: Patch<i64> = Patch::Value(5);
        let mapped: Result<Patch<i64>, String> = patch.try_map(|v| Ok(v * 2));
        assert_eq!(mapped.unwrap(), Patch::Value(10));

        let rejected: Result<Patch<i64>, String> = Patch::Value(-1).try_map(|_| Err("negative".into()));
        assert!(rejected.is_err());

        let null: Result<Patch<i64>, String> = Patch::<i64>::Null.try_map(|_| Err("unused".into()));
        assert_eq!(null.unwrap(), Patch::Null);
    }
}
