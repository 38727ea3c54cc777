//! Widget CLI commands.

use clap::Subcommand;
use colored::Colorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::{board, output};
use crate::error::StartpageError;
use crate::grid::WidgetId;
use crate::widgets::{WidgetSettings, WidgetType};

/// Widget subcommands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum WidgetCommands {
    /// Update a widget's settings.
    ///
    /// The given keys are merged over the current settings; other keys keep
    /// their values. The widget's position is not changed.
    #[command(after_long_help = r#"Examples:
  startpage widget set clock-1 --settings '{"style": "analog"}'
  startpage widget set quote-1 --settings '{"type": "quote"}'"#)]
    Set {
        /// Widget id.
        id: String,

        /// Settings to merge, as a JSON object.
        #[arg(long, short, value_name = "JSON")]
        settings: String,
    },

    /// Show a widget's settings as JSON.
    Get {
        /// Widget id.
        id: String,
    },

    /// List the widget types with their default and minimum sizes.
    Types,
}

/// Execute widget subcommands.
///
/// # Errors
///
/// Returns an error if the board cannot be loaded or saved, or the widget
/// or settings are rejected.
pub fn execute(cmd: &WidgetCommands) -> Result<(), StartpageError> {
    match cmd {
        WidgetCommands::Set { id, settings } => {
            let value: serde_json::Value = serde_json::from_str(settings)?;
            let Some(patch) = value.as_object() else {
                return Err(StartpageError::InvalidArguments(
                    "--settings must be a JSON object".to_string(),
                ));
            };
            let id = WidgetId::new(id.as_str());
            board::edit(|session| Ok(session.update_instance_settings(&id, patch)?))
        }
        WidgetCommands::Get { id } => {
            let session = board::open()?;
            let instance = session
                .instance(&WidgetId::new(id.as_str()))
                .ok_or_else(|| StartpageError::LayoutError(format!("unknown widget: {id}")))?;
            output::print_highlighted_json(&instance.settings.to_value());
            Ok(())
        }
        WidgetCommands::Types => {
            print_types();
            Ok(())
        }
    }
}

fn print_types() {
    #[derive(Tabled)]
    struct TypeRow {
        #[tabled(rename = "Type")]
        kind: &'static str,
        #[tabled(rename = "Default size")]
        default_size: String,
        #[tabled(rename = "Minimum size")]
        min_size: String,
        #[tabled(rename = "Default settings")]
        settings: String,
    }

    let rows = WidgetType::ALL.iter().map(|kind| {
        let default_size = kind.default_size();
        let min_size = kind.min_size();
        TypeRow {
            kind: kind.as_str(),
            default_size: format!("{}x{}", default_size.w, default_size.h),
            min_size: format!("{}x{}", min_size.w, min_size.h),
            settings: WidgetSettings::default_for(*kind).to_value().to_string(),
        }
    });

    println!("{}", "Widget types".bold());
    println!("{}", Table::new(rows).with(Style::rounded()));
}
