use serde::Deserialize;

/// Query string of the admin listing endpoints.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// Field to order by
    pub order_by: Option<String>,
    /// uid of the last document already shown
    pub start_after: Option<String>,
    /// Page size
    pub limit: Option<String>,
}

impl ListParams {
    /// Non-numeric or non-positive limits mean "no limit".
    pub fn limit(&self) -> Option<i64> {
        self.limit.as_deref().and_then(parse_limit)
    }
}

/// Position of the last document the client saw.
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    /// Value of the ordering field on that document (absent when ordering by id)
    pub sort_value: Option<String>,
    pub id: String,
}

/// Resolved page request handed to the repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRequest {
    pub order_by: Option<String>,
    pub after: Option<Cursor>,
    pub limit: Option<i64>,
}

impl PageRequest {
    /// Orders `(id, item)` pairs by `(order_by value, id)`, then applies the cursor and limit.
    pub fn apply<T>(
        &self,
        items: impl IntoIterator<Item = (String, T)>,
        sort_value: impl Fn(&T, &str) -> Option<String>,
    ) -> Vec<T> {
        let mut keyed: Vec<((String, String), T)> = items
            .into_iter()
            .map(|(id, item)| {
                let value = self
                    .order_by
                    .as_deref()
                    .and_then(|field| sort_value(&item, field))
                    .unwrap_or_default();
                ((value, id), item)
            })
            .collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));

        let start = self
            .after
            .as_ref()
            .map(|c| (c.sort_value.clone().unwrap_or_default(), c.id.clone()));

        keyed
            .into_iter()
            .filter(|(key, _)| start.as_ref().map_or(true, |s| key > s))
            .take(self.limit.map(|l| l as usize).unwrap_or(usize::MAX))
            .map(|(_, item)| item)
            .collect()
    }
}

pub fn parse_limit(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|l| *l > 0)
}

/// Reads an integer out of a JSON number or numeric string.
pub fn json_int(value: Option<&serde_json::Value>) -> Option<i64> {
    match value? {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_limit_parsing() {
        assert_eq!(parse_limit("10"), Some(10));
        assert_eq!(parse_limit("abc"), None);
        assert_eq!(parse_limit("0"), None);
    }

    #[test]
    fn test_apply_breaks_ties_on_id() {
        let rows = vec![
            ("u3".to_string(), ("Hopper", 3)),
            ("u1".to_string(), ("Hopper", 1)),
            ("u2".to_string(), ("Curie", 2)),
            ("u4".to_string(), ("Lovelace", 4)),
        ];
        let page = PageRequest {
            order_by: Some("lastName".into()),
            after: Some(Cursor { sort_value: Some("Hopper".into()), id: "u1".into() }),
            limit: Some(2),
        };
        let picked = page.apply(rows.clone(), |row, _| Some(row.0.to_string()));
        assert_eq!(picked.iter().map(|r| r.1).collect::<Vec<_>>(), vec![3, 4]);

        let by_id = PageRequest {
            after: Some(Cursor { sort_value: None, id: "u2".into() }),
            ..Default::default()
        };
        let picked = by_id.apply(rows, |row, _| Some(row.0.to_string()));
        assert_eq!(picked.iter().map(|r| r.1).collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_json_int_accepts_numbers_and_strings() {
        assert_eq!(json_int(Some(&json!(3))), Some(3));
        assert_eq!(json_int(Some(&json!("12"))), Some(12));
        assert_eq!(json_int(Some(&json!("twelve"))), None);
        assert_eq!(json_int(None), None);
    }
}
