use crate::domain::catalog::recognized_keys;
use crate::utils::error::{ContractError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::io::Read;

/// 表單勾選框送出的值
pub const CHECKBOX_SENTINEL: &str = "on";

/// A scalar value from the booking form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

/// Raw flat key/value submission, exactly as the form posted it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    fields: HashMap<String, FieldValue>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), FieldValue::Text(v.into())))
            .collect();
        Self { fields }
    }

    /// 從 JSON 物件載入；數字轉為文字，巢狀結構視為錯誤
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        let serde_json::Value::Object(obj) = value else {
            return Err(ContractError::malformed(
                "submission",
                "must be a flat JSON object",
            ));
        };

        let mut fields = HashMap::new();
        for (key, value) in obj {
            let field = match value {
                serde_json::Value::Null => continue,
                serde_json::Value::Bool(b) => FieldValue::Flag(b),
                serde_json::Value::String(s) => FieldValue::Text(s),
                serde_json::Value::Number(n) => FieldValue::Text(n.to_string()),
                serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                    return Err(ContractError::malformed(
                        &key,
                        "must be a scalar value, not a nested structure",
                    ));
                }
            };
            fields.insert(key, field);
        }
        Ok(Self { fields })
    }

    /// 從 CSV 讀取批次資料：標題列為欄位名稱，每一列是一份申請，空白儲存格視為缺少
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Vec<Self>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let mut submissions = Vec::new();

        for row in csv_reader.records() {
            let row = row?;
            let pairs = headers
                .iter()
                .zip(row.iter())
                .filter(|(_, value)| !value.is_empty());
            submissions.push(Self::from_pairs(pairs));
        }

        Ok(submissions)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        self.fields.insert(key.into(), value);
    }

    pub fn with_text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, FieldValue::Text(value.into()));
        self
    }

    pub fn with_checkbox(mut self, key: impl Into<String>) -> Self {
        self.insert(key, FieldValue::Text(CHECKBOX_SENTINEL.to_string()));
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.remove(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 文字值；缺少或為布林值時回傳空字串
    pub fn text(&self, key: &str) -> &str {
        match self.fields.get(key) {
            Some(FieldValue::Text(s)) => s.as_str(),
            _ => "",
        }
    }

    /// 缺少、空白或非文字時回傳 None
    pub fn non_blank(&self, key: &str) -> Option<&str> {
        let value = self.text(key).trim();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// 只有完全等於 "on" 或布林 true 才算勾選
    pub fn checkbox(&self, key: &str) -> bool {
        match self.fields.get(key) {
            Some(FieldValue::Flag(b)) => *b,
            Some(FieldValue::Text(s)) => s == CHECKBOX_SENTINEL,
            None => false,
        }
    }

    /// Keys that belong to no known field family, sorted.
    pub fn unrecognized_keys(&self) -> Vec<String> {
        let known: HashSet<String> = recognized_keys().into_iter().collect();
        let mut unknown: Vec<String> = self
            .fields
            .keys()
            .filter(|k| !known.contains(*k))
            .cloned()
            .collect();
        unknown.sort();
        unknown
    }
}
