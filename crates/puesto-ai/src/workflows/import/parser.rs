use super::normalizer::{empty_as_none, normalize_cell};
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// One CSV row: a single function of a position.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FunctionRow {
    /// 1-based line of the record in the source file, header included.
    pub(crate) line: u64,
    pub(crate) position_id: String,
    pub(crate) level_code: String,
    pub(crate) function_id: Option<String>,
    pub(crate) description: String,
    pub(crate) verb: String,
    pub(crate) scope: Option<String>,
    pub(crate) consequences: Option<String>,
    pub(crate) complexity: Option<String>,
    pub(crate) verb_appropriate: Option<String>,
    pub(crate) verb_forbidden: Option<String>,
    pub(crate) has_external_backing: Option<String>,
    pub(crate) alignment: Option<String>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<FunctionRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut record = csv::StringRecord::new();
    let mut rows = Vec::new();

    while csv_reader.read_record(&mut record)? {
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let row: CsvFunctionRow = record.deserialize(Some(&headers))?;
        if row.is_blank() {
            continue;
        }
        rows.push(row.into_function_row(line));
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct CsvFunctionRow {
    #[serde(alias = "puesto_id", default, deserialize_with = "empty_string_as_none")]
    position_id: Option<String>,
    #[serde(alias = "nivel", default, deserialize_with = "empty_string_as_none")]
    level_code: Option<String>,
    #[serde(alias = "funcion_id", default, deserialize_with = "empty_string_as_none")]
    function_id: Option<String>,
    #[serde(alias = "descripcion", default, deserialize_with = "empty_string_as_none")]
    description: Option<String>,
    #[serde(alias = "verbo", default, deserialize_with = "empty_string_as_none")]
    verb: Option<String>,
    #[serde(alias = "alcance", default, deserialize_with = "empty_string_as_none")]
    scope: Option<String>,
    #[serde(alias = "consecuencias", default, deserialize_with = "empty_string_as_none")]
    consequences: Option<String>,
    #[serde(alias = "complejidad", default, deserialize_with = "empty_string_as_none")]
    complexity: Option<String>,
    #[serde(alias = "verbo_apropiado", default, deserialize_with = "empty_string_as_none")]
    verb_appropriate: Option<String>,
    #[serde(alias = "verbo_prohibido", default, deserialize_with = "empty_string_as_none")]
    verb_forbidden: Option<String>,
    #[serde(alias = "respaldo_externo", default, deserialize_with = "empty_string_as_none")]
    has_external_backing: Option<String>,
    #[serde(alias = "alineacion", default, deserialize_with = "empty_string_as_none")]
    alignment: Option<String>,
}

impl CsvFunctionRow {
    fn is_blank(&self) -> bool {
        self.position_id.is_none()
            && self.level_code.is_none()
            && self.function_id.is_none()
            && self.description.is_none()
            && self.verb.is_none()
    }

    fn into_function_row(self, line: u64) -> FunctionRow {
        FunctionRow {
            line,
            position_id: self.position_id.unwrap_or_default(),
            level_code: self.level_code.unwrap_or_default(),
            function_id: self.function_id,
            description: self.description.unwrap_or_default(),
            verb: self.verb.unwrap_or_default(),
            scope: self.scope,
            consequences: self.consequences,
            complexity: self.complexity,
            verb_appropriate: self.verb_appropriate,
            verb_forbidden: self.verb_forbidden,
            has_external_backing: self.has_external_backing,
            alignment: self.alignment,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|raw| empty_as_none(&normalize_cell(&raw))))
}
