//! CLI host for the attachurl ingestion pipeline.

mod commands;

use anyhow::Result;
use attachurl_core::config;
use attachurl_core::model::{FieldKind, RecordId};
use attachurl_core::store::AttachmentDb;
use clap::{Parser, Subcommand, ValueEnum};

use commands::{
    run_add, run_add_json, run_completions, run_field_list, run_field_set, run_list, run_mime,
    run_record_add, run_record_show, run_submit, FieldSpec,
};

/// Top-level CLI for attachurl.
#[derive(Debug, Parser)]
#[command(name = "attachurl")]
#[command(about = "Download remote files into record attachment fields", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Create or inspect records.
    Record {
        #[command(subcommand)]
        action: RecordAction,
    },

    /// Define or list attachment fields.
    Field {
        #[command(subcommand)]
        action: FieldAction,
    },

    /// Add one or more URLs to a record field (errors go to the log).
    Add {
        record: RecordId,
        field: String,
        /// Remote file URLs, processed in order.
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Add URLs given as a JSON string or array of strings.
    AddJson {
        record: RecordId,
        field: String,
        json: String,
    },

    /// Submit a URL textarea as the record-edit form would; the body is read from stdin.
    Submit {
        /// Textarea name, `urlUpload*<field>*<record id>`.
        key: String,
        /// Role of the submitting editor (repeatable).
        #[arg(long = "role", value_name = "ROLE")]
        roles: Vec<String>,
        /// Submit as a superuser, bypassing role checks.
        #[arg(long)]
        superuser: bool,
    },

    /// List the attachments of a record field.
    List { record: RecordId, field: String },

    /// Show the MIME type to extension mapping, or look up one type.
    Mime {
        /// e.g. image/jpeg
        mime_type: Option<String>,
    },

    /// Print shell completions to stdout.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum RecordAction {
    /// Create a record, optionally nested in another record's container field.
    Add {
        #[arg(long, requires = "container_field", value_name = "ID")]
        container: Option<RecordId>,
        #[arg(long, requires = "container", value_name = "NAME")]
        container_field: Option<String>,
    },
    /// Show a record and its attachment counts.
    Show { id: RecordId },
}

#[derive(Debug, Subcommand)]
pub enum FieldAction {
    /// Create or replace a field definition.
    Set {
        name: String,
        #[arg(long, value_enum, default_value = "file")]
        kind: KindArg,
        /// Allowed extensions, space or comma separated.
        #[arg(long, default_value = "")]
        extensions: String,
        /// 0 = unlimited, 1 = single replaceable slot.
        #[arg(long, default_value_t = 0)]
        max_files: u32,
        #[arg(long)]
        max_width: Option<u32>,
        #[arg(long)]
        max_height: Option<u32>,
        /// Restrict editing to these roles (repeatable).
        #[arg(long = "edit-role", value_name = "ROLE")]
        edit_roles: Vec<String>,
    },
    /// List field definitions.
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Image,
    File,
}

impl From<KindArg> for FieldKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Image => FieldKind::Image,
            KindArg::File => FieldKind::File,
        }
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        // Commands that need neither config nor database.
        if let CliCommand::Completions { shell } = cli.command {
            run_completions(shell);
            return Ok(());
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        if let CliCommand::Mime { mime_type } = &cli.command {
            return run_mime(&cfg, mime_type.as_deref());
        }

        let db = AttachmentDb::open_default().await?;
        match cli.command {
            CliCommand::Record { action } => match action {
                RecordAction::Add {
                    container,
                    container_field,
                } => run_record_add(&db, container.zip(container_field)).await?,
                RecordAction::Show { id } => run_record_show(&db, id).await?,
            },
            CliCommand::Field { action } => match action {
                FieldAction::Set {
                    name,
                    kind,
                    extensions,
                    max_files,
                    max_width,
                    max_height,
                    edit_roles,
                } => {
                    let spec = FieldSpec {
                        name,
                        kind: kind.into(),
                        extensions,
                        max_files,
                        max_width,
                        max_height,
                        edit_roles,
                    };
                    run_field_set(&db, spec).await?
                }
                FieldAction::List => run_field_list(&db).await?,
            },
            CliCommand::Add { record, field, urls } => {
                run_add(&db, &cfg, record, &field, urls).await?
            }
            CliCommand::AddJson {
                record,
                field,
                json,
            } => run_add_json(&db, &cfg, record, &field, &json).await?,
            CliCommand::Submit {
                key,
                roles,
                superuser,
            } => run_submit(&db, &cfg, &key, roles, superuser).await?,
            CliCommand::List { record, field } => run_list(&db, record, &field).await?,
            CliCommand::Mime { .. } | CliCommand::Completions { .. } => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
