//src/main.rs
mod cli; // Keep cli module for parsing args

use anyhow::{bail, Context, Result};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use std::io::{self, stdin, stdout, Write}; // For prompts

use fitdex_lib::{
    i18n, parse_muscle_list, AppService, DetailBody, ExerciseId, ExerciseSummary,
    ExerciseUpdate, Muscle, Navigator, OriginFilter, Route, DELETE_ACTION_INDEX,
};

/// The CLI has no screens to move between; routes are only logged.
struct CliNavigator;

impl Navigator for CliNavigator {
    fn navigate(&mut self, route: Route) {
        log::debug!("navigate {route:?}");
    }

    fn go_back(&mut self) {
        log::debug!("navigate back");
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // --- Check for completion generation request FIRST ---
    let cli_args = cli::parse_args(); // Parse arguments once
    let export_csv = cli_args.export_csv;

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command();
        let bin_name = cmd.get_name().to_string();

        eprintln!("Generating completion script for {shell}...");
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    // Initialize the application service (loads config, connects to DB)
    let mut service =
        AppService::initialize().context("Failed to initialize application service")?;
    let header_color = Color::from(service.config.theme.header());

    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            unreachable!("Completion generation should have exited already");
        }
        cli::Commands::Show { identifier } => {
            let id = AppService::parse_exercise_id(&identifier)?;
            // Blocks on the worker thread for custom ids
            match service.resolve_exercise(&id) {
                Some(exercise) => print_exercise_details(
                    &id,
                    &DetailBody::from_exercise(&exercise),
                    header_color,
                ),
                // Nothing to render, matching the details screen
                None => log::warn!("No exercise found for '{id}'"),
            }
        }
        cli::Commands::List { origin, muscle } => {
            let origin = match origin {
                cli::OriginCli::All => OriginFilter::All,
                cli::OriginCli::BuiltIn => OriginFilter::BuiltIn,
                cli::OriginCli::Custom => OriginFilter::Custom,
            };
            let muscle = muscle.as_deref().map(parse_single_muscle).transpose()?;
            let exercises = service.list_exercises(origin, muscle)?;
            if export_csv {
                print_exercise_csv(&exercises)?;
            } else if exercises.is_empty() {
                println!("No exercises found matching the criteria.");
            } else {
                print_exercise_table(&exercises, header_color);
            }
        }
        cli::Commands::Create {
            name,
            primary,
            secondary,
            notes,
        } => {
            let primary = parse_muscle_arg(&primary)?;
            let secondary = secondary
                .as_deref()
                .map(parse_muscle_arg)
                .transpose()?
                .unwrap_or_default();
            match service.create_exercise(&name, notes.as_deref(), &primary, &secondary) {
                Ok(id) => println!("Successfully defined exercise '{}' ID: {id}", name.trim()),
                Err(e) => bail!("Error creating exercise: {e}"),
            }
        }
        cli::Commands::Edit {
            identifier,
            name,
            primary,
            secondary,
            notes,
        } => {
            let id = AppService::parse_exercise_id(&identifier)?;
            let update = ExerciseUpdate {
                name,
                notes: notes.map(|n| Some(n).filter(|n| !n.trim().is_empty())), // "" clears
                primary: primary.as_deref().map(parse_muscle_arg).transpose()?,
                secondary: secondary.as_deref().map(parse_muscle_arg).transpose()?,
            };
            match service.edit_exercise(&id, update) {
                Ok(rows) => println!(
                    "Successfully updated exercise '{id}' ({rows} row(s) affected)."
                ),
                Err(e) => bail!("Error editing exercise '{identifier}': {e}"),
            }
        }
        cli::Commands::Delete { identifier, yes } => {
            let id = AppService::parse_exercise_id(&identifier)?;
            let skip_prompt = yes || !service.config.confirm_delete;
            delete_with_confirmation(&mut service, id, skip_prompt)?;
        }
        cli::Commands::DbPath => {
            println!("Database file is located at: {:?}", service.get_db_path());
        }
        cli::Commands::ConfigPath => {
            println!("Config file is located at: {:?}", service.get_config_path());
        }
    }

    Ok(())
}

/// Runs the details screen delete flow: open the dialog, then confirm or
/// dismiss it depending on the answer.
fn delete_with_confirmation(
    service: &mut AppService,
    id: ExerciseId,
    skip_prompt: bool,
) -> Result<()> {
    let mut screen = service.open_details(id.clone());
    screen.wait();
    if let Some(actions) = screen.actions_mut() {
        actions.select_overflow(DELETE_ACTION_INDEX);
    } else {
        bail!("Built-in exercise '{id}' cannot be deleted.");
    }
    // No record, no dialog
    let Some((title, description)) = screen.delete_dialog() else {
        bail!("Exercise '{id}' not found to delete.");
    };
    let Some(actions) = screen.actions_mut() else {
        bail!("Built-in exercise '{id}' cannot be deleted.");
    };

    if !skip_prompt && !prompt_delete(&id, &title, &description)? {
        actions.dismiss_delete();
        println!("Deletion cancelled.");
        return Ok(());
    }

    match actions.confirm_delete(&service.store, &mut CliNavigator) {
        Some(Ok(rows)) => {
            println!("Successfully deleted exercise '{id}' ({rows} row(s) affected).");
            Ok(())
        }
        Some(Err(e)) => bail!("Error deleting exercise '{id}': {e}"),
        None => bail!("Deletion of '{id}' was not confirmed."),
    }
}

fn prompt_delete(id: &ExerciseId, title: &str, description: &str) -> Result<bool> {
    println!("{title}");
    println!("{description}");
    print!("Delete '{id}'? (y/N): ");
    stdout().flush().context("Failed to flush prompt")?;

    let mut input = String::new();
    stdin()
        .read_line(&mut input)
        .context("Failed to read confirmation")?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

fn parse_muscle_arg(input: &str) -> Result<Vec<Muscle>> {
    parse_muscle_list(input).with_context(|| format!("Invalid muscle list '{input}'"))
}

fn parse_single_muscle(input: &str) -> Result<Muscle> {
    match parse_muscle_arg(input)?.as_slice() {
        [muscle] => Ok(*muscle),
        _ => bail!("Expected exactly one muscle, got '{input}'"),
    }
}

// --- Table Printing Functions ---

/// Prints the details view of one exercise as a two column table.
fn print_exercise_details(id: &ExerciseId, body: &DetailBody, header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new(&body.title)
                .fg(header_color)
                .add_attribute(Attribute::Bold),
            Cell::new(id.to_string()).fg(header_color),
        ]);

    if let Some(notes) = &body.notes {
        table.add_row(vec![Cell::new(""), Cell::new(notes)]);
    }
    table.add_row(vec![
        Cell::new(&body.primary_caption),
        Cell::new(&body.primary_muscles),
    ]);
    if let Some((caption, names)) = &body.secondary {
        table.add_row(vec![Cell::new(caption), Cell::new(names)]);
    }
    println!("{table}");
}

/// Prints exercises in a formatted table.
fn print_exercise_table(exercises: &[ExerciseSummary], header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(header_color),
            Cell::new("Name").fg(header_color),
            Cell::new(i18n::translate("primary_muscle")).fg(header_color),
        ]);

    for exercise in exercises {
        let id_cell = Cell::new(exercise.id.to_string());
        table.add_row(vec![
            if exercise.id.is_custom() {
                id_cell.add_attribute(Attribute::Italic)
            } else {
                id_cell
            },
            Cell::new(&exercise.name),
            Cell::new(i18n::muscle_names(&exercise.primary)),
        ]);
    }
    println!("{table}");
}

fn print_exercise_csv(exercises: &[ExerciseSummary]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());

    // Write header
    writer.write_record(["ID", "Name", "Primary"])?;

    for exercise in exercises {
        writer.write_record([
            exercise.id.to_string(),
            exercise.name.clone(),
            fitdex_lib::exercise::join_muscle_codes(&exercise.primary),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
