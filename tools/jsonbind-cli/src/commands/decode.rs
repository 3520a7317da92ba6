use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use anyhow::{Context, Result, anyhow};
use clap::Args;
use jsonbind::{Record, format_record};
use jsonbind_json::{NumberPolicy, parse_value_with_policy};
use tracing::info;

use crate::schema_file::SchemaFile;

#[derive(Args)]
pub struct DecodeArgs {
    /// Path to the schema file
    schema: PathBuf,

    /// Path to the JSON document (stdin if not specified)
    input: Option<PathBuf>,

    /// Root type to decode into (defaults to the schema's root)
    #[arg(short, long)]
    root: Option<String>,

    /// Output file path (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fail on integers outside the i64 range instead of reading them as floats
    #[arg(long)]
    reject_big_ints: bool,
}

impl DecodeArgs {
    pub fn run(self) -> Result<()> {
        let schema = SchemaFile::load(&self.schema)?;
        let root = schema.root_type(self.root.as_deref())?.to_string();
        let decoder = schema.decoder()?;

        let text = match &self.input {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
            None => {
                let mut text = String::new();
                io::stdin().read_to_string(&mut text)?;
                text
            }
        };

        let policy = if self.reject_big_ints {
            NumberPolicy::Reject
        } else {
            NumberPolicy::Float
        };
        let value = parse_value_with_policy(&text, policy)?;

        info!(root = %root, "decoding document");
        let target = decoder.decode_new(&root, &value)?;
        let record = Record::from_target(target.as_ref())
            .ok_or_else(|| anyhow!("type '{root}' is not a record"))?;
        let text = format_record(record)?;

        match self.output {
            Some(path) => fs::write(path, text)?,
            None => print!("{text}"),
        }
        Ok(())
    }
}
