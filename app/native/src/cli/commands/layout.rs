//! Layout CLI commands.
//!
//! Moves and resizes are replayed as pointer gestures through the session,
//! so they obey exactly the same rules as interactive edits.

use clap::Subcommand;
use colored::Colorize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::cli::{board, output};
use crate::error::StartpageError;
use crate::grid::{
    DragOperation, GridPoint, InteractionOutcome, Placement, PointerDown, ScreenPoint, Session,
    SessionError, WidgetId,
};
use crate::persistence::{StoredSettings, export_share_code, import_share_code};
use crate::widgets::{WidgetSettings, WidgetType};

/// Layout subcommands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum LayoutCommands {
    /// Show the widgets on the board.
    Show {
        /// Output the stored document as JSON.
        #[arg(long, short)]
        json: bool,
    },

    /// Add a widget at the first free position.
    ///
    /// Prints the id of the new widget.
    #[command(after_long_help = r#"Examples:
  startpage layout add clock
  startpage layout add sticky --settings '{"color": "pink"}'"#)]
    Add {
        /// Widget type: clock, weather, quote, bookmarks, todo, sticky, kanban.
        #[arg(value_name = "TYPE")]
        kind: WidgetType,

        /// Settings to merge over the type's defaults, as a JSON object.
        #[arg(long, short, value_name = "JSON")]
        settings: Option<String>,
    },

    /// Remove a widget and its stored data.
    Remove {
        /// Widget id.
        id: String,
    },

    /// Move a widget so its top-left corner is at cell (X, Y).
    #[command(allow_negative_numbers = true)]
    Move {
        /// Widget id.
        id: String,
        /// Target column.
        x: i32,
        /// Target row.
        y: i32,
    },

    /// Resize a widget to W by H cells.
    #[command(allow_negative_numbers = true)]
    Resize {
        /// Widget id.
        id: String,
        /// Width in cells.
        w: i32,
        /// Height in cells.
        h: i32,
    },

    /// Replace the board with the starter layout.
    Reset,

    /// Print a share code for the board.
    Export,

    /// Replace the board with one from a share code.
    Import {
        /// Share code printed by `startpage layout export`.
        code: String,
    },
}

/// Execute layout subcommands.
///
/// # Errors
///
/// Returns an error if the board cannot be loaded or saved, or if the
/// operation is rejected.
pub fn execute(cmd: &LayoutCommands) -> Result<(), StartpageError> {
    match cmd {
        LayoutCommands::Show { json } => show(*json),
        LayoutCommands::Add { kind, settings } => {
            let settings = parse_settings(*kind, settings.as_deref())?;
            let id = board::edit(|session| Ok(session.add_instance(settings)?))?;
            println!("{id}");
            Ok(())
        }
        LayoutCommands::Remove { id } => {
            board::edit(|session| Ok(session.remove_instance(&WidgetId::new(id.as_str()))?))
        }
        LayoutCommands::Move { id, x, y } => {
            let id = WidgetId::new(id.as_str());
            let placement = board::edit(|session| move_widget(session, &id, GridPoint::new(*x, *y)))?;
            print_placement(&placement);
            Ok(())
        }
        LayoutCommands::Resize { id, w, h } => {
            let id = WidgetId::new(id.as_str());
            let placement = board::edit(|session| resize_widget(session, &id, *w, *h))?;
            print_placement(&placement);
            Ok(())
        }
        LayoutCommands::Reset => board::edit(|session| {
            session.load(StoredSettings::default());
            Ok(())
        }),
        LayoutCommands::Export => {
            let session = board::open()?;
            println!("{}", export_share_code(&session.snapshot())?);
            Ok(())
        }
        LayoutCommands::Import { code } => {
            let settings = import_share_code(code)?;
            board::edit(|session| {
                session.load(settings);
                Ok(())
            })
        }
    }
}

/// Default settings for `kind` with an optional JSON patch merged in.
fn parse_settings(kind: WidgetType, patch: Option<&str>) -> Result<WidgetSettings, StartpageError> {
    let defaults = WidgetSettings::default_for(kind);
    let Some(patch) = patch else {
        return Ok(defaults);
    };
    let value: serde_json::Value = serde_json::from_str(patch)?;
    let Some(object) = value.as_object() else {
        return Err(StartpageError::InvalidArguments(
            "--settings must be a JSON object".to_string(),
        ));
    };
    defaults.merged(object).map_err(|err| {
        StartpageError::InvalidArguments(format!("invalid settings for {kind}: {err}"))
    })
}

// ============================================================================
// Gestures
// ============================================================================

fn move_widget(
    session: &mut Session,
    id: &WidgetId,
    target: GridPoint,
) -> Result<Placement, StartpageError> {
    let placement = session.placement(id).ok_or_else(|| SessionError::UnknownWidget(id.clone()))?;
    let metrics = *session.metrics();
    let from = metrics.cell_center(placement.rect().origin());
    let to = metrics.cell_center(target);
    replay_gesture(session, &PointerDown::new(id.clone(), DragOperation::Move, from), to)
}

fn resize_widget(
    session: &mut Session,
    id: &WidgetId,
    w: i32,
    h: i32,
) -> Result<Placement, StartpageError> {
    let placement = session.placement(id).ok_or_else(|| SessionError::UnknownWidget(id.clone()))?;
    let rect = placement.rect();
    let metrics = *session.metrics();
    let pitch = metrics.pitch();
    let from = metrics.cell_center(GridPoint::new(rect.right() - 1, rect.bottom() - 1));
    let to = ScreenPoint::new(
        from.x + f64::from(w - rect.w) * pitch,
        from.y + f64::from(h - rect.h) * pitch,
    );
    replay_gesture(session, &PointerDown::new(id.clone(), DragOperation::Resize, from), to)
}

/// Runs one down/move/up sequence with editing temporarily enabled.
fn replay_gesture(
    session: &mut Session,
    down: &PointerDown,
    to: ScreenPoint,
) -> Result<Placement, StartpageError> {
    let was_editing = session.is_editing();
    session.set_editing(true);
    let outcome = if session.pointer_down(down) {
        session.pointer_move(to);
        session.pointer_up()
    } else {
        InteractionOutcome::Idle
    };
    session.set_editing(was_editing);

    match outcome {
        InteractionOutcome::Committed(placement) => Ok(placement),
        _ => Err(StartpageError::CommandError(format!(
            "{} of {} not accepted: it would overlap another widget or leave the grid",
            match down.operation {
                DragOperation::Move => "move",
                DragOperation::Resize => "resize",
            },
            down.id
        ))),
    }
}

// ============================================================================
// Output
// ============================================================================

fn print_placement(placement: &Placement) {
    println!(
        "{} at {}, {} ({}x{})",
        placement.id.as_str().bold(),
        placement.x,
        placement.y,
        placement.w,
        placement.h
    );
}

fn show(json: bool) -> Result<(), StartpageError> {
    #[derive(Tabled)]
    struct WidgetRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Type")]
        kind: String,
        #[tabled(rename = "Position")]
        position: String,
        #[tabled(rename = "Size")]
        size: String,
        #[tabled(rename = "Valid")]
        valid: String,
    }

    let session = board::open()?;
    if json {
        output::print_highlighted_json(&serde_json::to_value(session.snapshot())?);
        return Ok(());
    }

    if session.layout().is_empty() {
        println!("{}", "The board is empty.".dimmed());
        return Ok(());
    }

    let invalid = session.invalid_placements();
    let rows: Vec<WidgetRow> = session
        .layout()
        .iter()
        .map(|placement| WidgetRow {
            id: placement.id.to_string(),
            kind: session
                .registry()
                .find(&placement.id)
                .map_or_else(String::new, |instance| instance.widget_type().to_string()),
            position: format!("{}, {}", placement.x, placement.y),
            size: format!("{}x{}", placement.w, placement.h),
            valid: output::format_bool(!invalid.contains(&placement.id)),
        })
        .collect();

    let dims = session.dimensions();
    let count = rows.len();
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..4)).with(Alignment::right()))
        .with(Modify::new(Columns::new(4..5)).with(Alignment::center()))
        .to_string();

    println!("{}", format!("Widgets ({count}) on a {}x{} grid", dims.cols, dims.rows).bold());
    println!("{table}");
    if session.is_editing() {
        println!("{}", "Edit mode is on.".dimmed());
    }
    Ok(())
}
