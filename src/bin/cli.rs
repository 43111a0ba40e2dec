use anyhow::Context;
use clap::Parser;
use grade_tracker::{
    CourseEditor, Field, GradeStore, Gradebook, GradebookConfig, GradebookError,
    MemoryGradeStore, SqliteGradeStore, save_gradebook_to_csv, save_gradebook_to_json,
};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "grades", about = "Track weighted course grades")]
struct Args {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// SQLite database path (overrides the config file)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Keep everything in memory; nothing is written to disk
    #[arg(long, conflicts_with = "db")]
    memory: bool,
}

fn render_line<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::from("|");
    for (ci, cell) in cells.enumerate() {
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(widths[ci].saturating_sub(cell.len())));
        line.push_str(" |");
    }
    line
}

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            if cell.len() > widths[ci] {
                widths[ci] = cell.len();
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_line(&widths, headers.iter().copied()));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        out.push_str(&render_line(&widths, row.iter().map(String::as_str)));
        out.push('\n');
    }
    out.push_str(&sep);
    out
}

fn render_courses<S: GradeStore>(gradebook: &Gradebook<S>) -> String {
    let rows: Vec<Vec<String>> = gradebook
        .courses()
        .iter()
        .map(|editor| {
            let course = editor.course();
            vec![
                course.code().to_string(),
                course.assignments().len().to_string(),
                format!("{:.2}", course.average()),
            ]
        })
        .collect();
    render_text_table(&["course", "assignments", "avg"], &rows)
}

fn render_rows(editor: &CourseEditor) -> String {
    let rows: Vec<Vec<String>> = editor
        .rows()
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let mut cells = vec![(idx + 1).to_string()];
            cells.extend(Field::ALL.iter().map(|field| row.get(*field).to_string()));
            cells
        })
        .collect();
    format!(
        "Assignments for {}\n{}\nAverage: {:.2}",
        editor.code(),
        render_text_table(&["#", "assignment", "earned", "total", "weight"], &rows),
        editor.course().average()
    )
}

fn print_help() {
    println!(
        "Commands:\n  help                           Show this help\n  show                           List courses and their averages\n  course add <code>              Create a course\n  course delete <code>           Delete a course and all of its rows\n  edit <code>                    Open the assignment editor for a course\n  export <json|csv> <path>       Write committed grades to a file\n  quit|exit                      Exit\nEditor commands:\n  rows                           Show the rows being edited\n  add                            Append an empty assignment row\n  set <n> <field> <text...>      Set name|earned|total|weight of row n\n  clear <n> <field>              Blank a field and null it on commit\n  commit                         Validate and save the rows\n  discard                        Drop uncommitted edits and leave the editor\n  close                          Commit and leave the editor"
    );
}

fn print_error(err: &GradebookError) {
    match err {
        GradebookError::Validation(err) => {
            println!("Invalid entry: {err}");
            println!(
                "Please ensure that \"total\" is a positive number, and that \"earned\" and \"weight\" are non-negative numbers."
            );
        }
        other => println!("Error: {other}"),
    }
}

fn parse_position(editor: &CourseEditor, raw: &str) -> Option<grade_tracker::RowId> {
    raw.parse::<usize>().ok().and_then(|pos| editor.row_at(pos))
}

fn run<S: GradeStore>(gradebook: &mut Gradebook<S>) {
    println!("Grade Tracker - type 'help' for commands\n");
    println!("{}", render_courses(&*gradebook));

    let stdin = io::stdin();
    let mut line = String::new();
    let mut editing: Option<String> = None;
    loop {
        match &editing {
            Some(code) => print!("{code}> "),
            None => print!("> "),
        }
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => {
                for editor in gradebook.courses().iter().filter(|e| e.has_pending_edits()) {
                    println!("Uncommitted edits to {} discarded.", editor.code());
                }
                break;
            }
            "show" => println!("{}", render_courses(&*gradebook)),
            "course" => match (parts.next(), parts.next()) {
                (Some("add"), Some(code)) => match gradebook.register_course(code) {
                    Ok(_) => {
                        println!("Course {code} added.");
                        println!("{}", render_courses(&*gradebook));
                    }
                    Err(e) => print_error(&e),
                },
                (Some("delete"), Some(code)) => match gradebook.delete_course(code) {
                    Ok(true) => {
                        if editing.as_deref() == Some(code) {
                            editing = None;
                        }
                        println!("Deleted course {code}.");
                        println!("{}", render_courses(&*gradebook));
                    }
                    Ok(false) => println!("Course {code} not found."),
                    Err(e) => print_error(&e),
                },
                _ => println!("Usage: course add <code> | course delete <code>"),
            },
            "edit" => match parts.next() {
                Some(code) => match gradebook.course(code) {
                    Some(editor) => {
                        println!("{}", render_rows(editor));
                        editing = Some(code.to_string());
                    }
                    None => println!("Course {code} not found."),
                },
                None => println!("Usage: edit <code>"),
            },
            "export" => {
                let fmt = parts.next();
                let path = parts.next();
                let result = match (fmt, path) {
                    (Some("json"), Some(path)) => save_gradebook_to_json(&*gradebook, path),
                    (Some("csv"), Some(path)) => save_gradebook_to_csv(&*gradebook, path),
                    _ => {
                        println!("Usage: export <json|csv> <path>");
                        continue;
                    }
                };
                match result {
                    Ok(_) => println!("Grades exported to {}.", path.unwrap_or_default()),
                    Err(e) => println!("Error exporting grades: {e}"),
                }
            }
            "rows" | "add" | "set" | "clear" | "commit" | "discard" | "close" => {
                let Some(code) = editing.clone() else {
                    println!("No course open. Use 'edit <code>' first.");
                    continue;
                };
                match cmd {
                    "rows" => {}
                    "add" => match gradebook.add_row(&code) {
                        Ok(id) => println!("Added row {id}."),
                        Err(e) => {
                            print_error(&e);
                            continue;
                        }
                    },
                    "set" | "clear" => {
                        let Some(editor) = gradebook.course(&code) else {
                            continue;
                        };
                        let pos_s = parts.next();
                        let field_s = parts.next();
                        let rest: Vec<&str> = parts.collect();
                        let (Some(pos_s), Some(field_s)) = (pos_s, field_s) else {
                            println!("Usage: {cmd} <n> <field>{}", if cmd == "set" { " <text...>" } else { "" });
                            continue;
                        };
                        let Some(row) = parse_position(editor, pos_s) else {
                            println!("Invalid row number");
                            continue;
                        };
                        let field: Field = match field_s.parse() {
                            Ok(f) => f,
                            Err(e) => {
                                println!("{e}");
                                continue;
                            }
                        };
                        let result = if cmd == "set" {
                            gradebook.set_field(&code, row, field, rest.join(" "))
                        } else {
                            gradebook.clear_field(&code, row, field)
                        };
                        if let Err(e) = result {
                            print_error(&e);
                            continue;
                        }
                    }
                    "discard" => {
                        if let Err(e) = gradebook.discard(&code) {
                            print_error(&e);
                        }
                        println!("Edits discarded.");
                        editing = None;
                        continue;
                    }
                    _ => match gradebook.update_assignments(&code) {
                        Ok(average) => {
                            println!("Assignments updated. Average for {code}: {average:.2}");
                            if cmd == "close" {
                                editing = None;
                                println!("{}", render_courses(&*gradebook));
                                continue;
                            }
                        }
                        Err(e) => {
                            print_error(&e);
                            continue;
                        }
                    },
                }
                if let Some(editor) = gradebook.course(&code) {
                    println!("{}", render_rows(editor));
                }
            }
            other => {
                println!("Unknown command '{other}'. Type 'help' for commands.");
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = GradebookConfig::load_or_default(args.config.as_deref())?;
    if let Some(db) = args.db {
        config.database_path = db;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(io::stderr)
        .init();

    if args.memory {
        let mut gradebook = Gradebook::open(MemoryGradeStore::new())?;
        run(&mut gradebook);
    } else {
        let store = SqliteGradeStore::new(&config.database_path).with_context(|| {
            format!("failed to open database {}", config.database_path.display())
        })?;
        let mut gradebook = Gradebook::open(store)?;
        run(&mut gradebook);
    }
    Ok(())
}
