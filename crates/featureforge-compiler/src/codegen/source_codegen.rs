//! Source blocks

use super::Render;
use crate::writer::{list, quote, quoted_list, ConfigWriter};
use featureforge_core::{
    AvroJsonSchema, HdfsSource, JdbcAuth, JdbcSource, KafkaSource, Source, SourceSchema,
    INPUT_CONTEXT_NAME,
};

impl Render for Source {
    fn write_config(&self, w: &mut ConfigWriter) {
        match self {
            Source::InputContext => {
                w.field("source", INPUT_CONTEXT_NAME);
            }
            Source::Hdfs(s) => s.write_config(w),
            Source::Jdbc(s) => s.write_config(w),
            Source::Kafka(s) => s.write_config(w),
        }
    }
}

/// Emitted only when the source declares an event timestamp column
fn write_time_window(w: &mut ConfigWriter, column: Option<&str>, format: &str) {
    if let Some(column) = column {
        w.open("timeWindowParameters")
            .quoted("timestampColumn", column)
            .quoted("timestampColumnFormat", format)
            .close();
    }
}

fn placeholder(source_name: &str, suffix: &str) -> String {
    format!("${{{}_{}}}", source_name, suffix)
}

impl Render for HdfsSource {
    fn write_config(&self, w: &mut ConfigWriter) {
        w.open(&self.name);
        w.line(format!("location: {{path: {}}}", quote(&self.path)));
        write_time_window(w, self.event_timestamp_column.as_deref(), &self.timestamp_format);
        w.close();
    }
}

impl Render for JdbcSource {
    fn write_config(&self, w: &mut ConfigWriter) {
        w.open(&self.name);
        w.open("location");
        w.quoted("type", "jdbc");
        w.quoted("url", &self.url);

        if let Some(dbtable) = &self.dbtable {
            w.quoted("dbtable", dbtable);
        } else if let Some(query) = &self.query {
            w.quoted("query", query);
        }

        match self.auth {
            Some(JdbcAuth::UserPass) => {
                w.quoted("user", &placeholder(&self.name, "USER"));
                w.quoted("password", &placeholder(&self.name, "PASSWORD"));
            }
            Some(JdbcAuth::Token) => {
                w.field("useToken", "true");
                w.quoted("token", &placeholder(&self.name, "TOKEN"));
            }
            None => {
                w.field("anonymous", "true");
            }
        }
        w.close();

        write_time_window(w, self.event_timestamp_column.as_deref(), &self.timestamp_format);
        w.close();
    }
}

impl Render for KafkaSource {
    fn write_config(&self, w: &mut ConfigWriter) {
        w.open(&self.name);
        w.field("type", "KAFKA");
        w.open("config");
        w.field("brokers", quoted_list(&self.config.brokers));
        w.field("topics", list(&self.config.topics));
        self.config.schema.write_config(w);
        w.close();
        w.close();
    }
}

impl Render for SourceSchema {
    fn write_config(&self, w: &mut ConfigWriter) {
        match self {
            SourceSchema::AvroJson(schema) => schema.write_config(w),
        }
    }
}

impl Render for AvroJsonSchema {
    fn write_config(&self, w: &mut ConfigWriter) {
        w.open("schema");
        w.line(r#"type = "avro""#);
        w.field("avroJson", quote(&self.schema_str));
        w.close();
    }
}
