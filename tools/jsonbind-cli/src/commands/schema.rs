use std::{fs, path::PathBuf};

use anyhow::{Result, bail};
use clap::Args;
use jsonbind::core::format_type_def;

use crate::schema_file::SchemaFile;

#[derive(Args)]
pub struct SchemaArgs {
    /// Path to the schema file
    schema: PathBuf,

    /// Only print this type
    #[arg(short = 't', long = "type")]
    type_name: Option<String>,

    /// Output file path (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl SchemaArgs {
    pub fn run(self) -> Result<()> {
        let schema = SchemaFile::load(&self.schema)?;
        let records = schema.records()?;

        let mut text = String::new();
        for record in &records {
            if self
                .type_name
                .as_deref()
                .is_some_and(|name| name != record.type_name())
            {
                continue;
            }
            text.push_str(&format_type_def(record.type_name(), record.fields())?);
        }

        if text.is_empty()
            && let Some(name) = &self.type_name
        {
            bail!("type '{name}' is not defined in {}", self.schema.display());
        }

        match self.output {
            Some(path) => fs::write(path, text)?,
            None => print!("{text}"),
        }
        Ok(())
    }
}
