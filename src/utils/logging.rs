use log::kv::{self, Key, Value, VisitSource};
use log::Record;
use serde_json::{Map, Value as Json};
use std::io::Write;

/// Inicializa o logger com uma linha JSON por registro.
/// Filtro padrão `info`, sobrescrito por `RUST_LOG`.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::new().default_filter_or("info"))
        .format(|buf, record| {
            let line = format_record(record, chrono::Utc::now().timestamp_millis());
            writeln!(buf, "{}", line)
        })
        .try_init();
}

/// Campos estruturados (`key = value` nas macros de log) viram chaves de topo no JSON
struct JsonFields<'a>(&'a mut Map<String, Json>);

impl<'kvs> VisitSource<'kvs> for JsonFields<'_> {
    fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>) -> Result<(), kv::Error> {
        let json = if let Some(n) = value.to_u64() {
            Json::from(n)
        } else if let Some(n) = value.to_i64() {
            Json::from(n)
        } else if let Some(b) = value.to_bool() {
            Json::from(b)
        } else {
            Json::from(value.to_string())
        };
        self.0.insert(key.as_str().to_string(), json);
        Ok(())
    }
}

fn format_record(record: &Record, time_ms: i64) -> String {
    let mut line = Map::new();
    // erro de visita só perde os campos extras, a linha sai mesmo assim
    let _ = record.key_values().visit(&mut JsonFields(&mut line));

    line.insert("level".to_string(), Json::from(record.level().to_string()));
    line.insert("message".to_string(), Json::from(record.args().to_string()));
    line.insert("logger".to_string(), Json::from(record.target()));
    line.insert("time".to_string(), Json::from(time_ms));
    Json::Object(line).to_string()
}
