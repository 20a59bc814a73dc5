use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use snaptic::auth::Credentials;
use snaptic::types::Note;
use snaptic::{ClientConfig, SnapticClient};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snaptic", version, about = "Snaptic notes API command-line client")]
struct Cli {
    #[command(flatten)]
    server: ServerArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ServerArgs {
    /// API host
    #[arg(long, global = true, default_value = snaptic::client::API_SERVER)]
    host: String,
    /// API port
    #[arg(long, global = true, default_value = "443")]
    port: u16,
    /// Use plain HTTP instead of HTTPS
    #[arg(long, global = true)]
    no_ssl: bool,
    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "10")]
    timeout: u64,
}

#[derive(Subcommand)]
enum Command {
    /// Save credentials (username/password or `cookie_epass`)
    Login {
        /// Account user name
        #[arg(short, long, requires = "password", conflicts_with = "cookie")]
        username: Option<String>,
        /// Account password
        #[arg(short, long, requires = "username")]
        password: Option<String>,
        /// `cookie_epass` session token
        #[arg(long)]
        cookie: Option<String>,
        /// Check saved credentials against the server
        #[arg(long, conflicts_with_all = ["username", "cookie"])]
        check: bool,
    },
    /// Clear saved credentials
    Logout,
    /// List notes
    Notes {
        /// Only fetch one cursor window (-1 = most recent 20, 0 = all)
        #[arg(short, long, allow_negative_numbers = true)]
        cursor: Option<i64>,
        /// Also download attached image bytes
        #[arg(long, conflicts_with = "cursor")]
        images: bool,
    },
    /// Show cursor window position
    Cursor {
        #[arg(allow_negative_numbers = true)]
        position: i64,
    },
    /// Create a note
    Post {
        text: String,
    },
    /// Replace the text of an existing note
    Edit {
        note_id: u64,
        text: String,
    },
    /// Delete a note
    Delete {
        note_id: u64,
    },
    /// Attach an image file to a note
    Attach {
        note_id: u64,
        file: PathBuf,
    },
    /// Download an image
    Image {
        image_id: u64,
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show current user info
    Me,
    /// Show tags with note counts
    Tags,
    /// Print raw notes JSON
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let server = cli.server;
    match cli.command {
        Command::Login {
            username,
            password,
            cookie,
            check,
        } => cmd_login(&server, username, password, cookie, check),
        Command::Logout => cmd_logout(),
        Command::Notes { cursor, images } => cmd_notes(&server, cursor, images),
        Command::Cursor { position } => cmd_cursor(&server, position),
        Command::Post { text } => cmd_post(&server, &text),
        Command::Edit { note_id, text } => cmd_edit(&server, note_id, text),
        Command::Delete { note_id } => cmd_delete(&server, note_id),
        Command::Attach { note_id, file } => cmd_attach(&server, note_id, &file),
        Command::Image { image_id, output } => cmd_image(&server, image_id, output),
        Command::Me => cmd_me(&server),
        Command::Tags => cmd_tags(&server),
        Command::Json => cmd_json(&server),
    }
}

fn connect(server: &ServerArgs, credentials: Credentials) -> Result<SnapticClient> {
    if !credentials.is_configured() {
        bail!("not logged in; run `snaptic login` first");
    }
    let config = ClientConfig::new(credentials)
        .with_host(server.host.clone())
        .with_port(server.port)
        .with_ssl(!server.no_ssl)
        .with_timeout(Duration::from_secs(server.timeout));
    Ok(SnapticClient::new(config)?)
}

fn client(server: &ServerArgs) -> Result<SnapticClient> {
    connect(server, Credentials::load()?)
}

fn print_note(note: &Note) {
    let id = note.note_id().map_or_else(|| "-".to_owned(), |id| id.to_string());
    println!("  [{id}] {}", note.summary);
    if !note.tags.is_empty() {
        println!("        tags: {}", note.tags.join(", "));
    }
    for image in &note.media {
        let size = image
            .data
            .as_ref()
            .map_or_else(String::new, |d| format!(", {} bytes", d.len()));
        println!(
            "        image {} ({}x{}{size}) {}",
            image.id, image.width, image.height, image.src
        );
    }
}

// ── login / logout ──

fn cmd_login(
    server: &ServerArgs,
    username: Option<String>,
    password: Option<String>,
    cookie: Option<String>,
    check: bool,
) -> Result<()> {
    if check {
        let creds = Credentials::load()?;
        if creds.is_configured() {
            let mut client = connect(server, creds)?;
            match client.fetch_user() {
                Ok(user) => println!("Logged in as: {} (id={})", user.user_name, user.id),
                Err(e) => println!("Credentials saved but validation failed: {e}"),
            }
        } else {
            println!("Not logged in.");
        }
        return Ok(());
    }

    let creds = Credentials {
        username,
        password,
        cookie_epass: cookie,
    };
    if !creds.is_configured() {
        bail!("provide --username and --password, or --cookie");
    }
    creds.save()?;
    println!("Credentials saved.");
    Ok(())
}

fn cmd_logout() -> Result<()> {
    Credentials::clear()?;
    println!("Credentials cleared.");
    Ok(())
}

// ── notes ──

fn cmd_notes(server: &ServerArgs, cursor: Option<i64>, images: bool) -> Result<()> {
    let mut client = client(server)?;
    let notes = match cursor {
        Some(c) => client.fetch_notes_from_cursor(c)?,
        None if images => client.fetch_notes_with_image_data()?,
        None => client.fetch_notes()?,
    };
    println!("{} notes\n", notes.len());
    for note in &notes {
        print_note(note);
    }
    Ok(())
}

fn cmd_cursor(server: &ServerArgs, position: i64) -> Result<()> {
    let info = client(server)?.fetch_cursor_info(position)?;
    println!("Previous: {}", info.previous_cursor);
    println!("Next:     {}", info.next_cursor);
    println!("Count:    {}", info.count);
    Ok(())
}

fn cmd_post(server: &ServerArgs, text: &str) -> Result<()> {
    let resp = client(server)?.post_note(text)?;
    println!("{}", String::from_utf8_lossy(&resp));
    Ok(())
}

fn cmd_edit(server: &ServerArgs, note_id: u64, text: String) -> Result<()> {
    let mut client = client(server)?;
    let mut note = client
        .notes()?
        .iter()
        .find(|n| n.note_id() == Some(note_id))
        .cloned()
        .with_context(|| format!("note {note_id} not found"))?;
    note.text = text;
    client.edit_note(&note)?;
    println!("Note {note_id} updated.");
    Ok(())
}

fn cmd_delete(server: &ServerArgs, note_id: u64) -> Result<()> {
    client(server)?.delete_note(note_id)?;
    println!("Note {note_id} deleted.");
    Ok(())
}

// ── images ──

fn cmd_attach(server: &ServerArgs, note_id: u64, file: &Path) -> Result<()> {
    client(server)?.attach_image_file(file, note_id)?;
    println!("Attached {} to note {note_id}.", file.display());
    Ok(())
}

fn cmd_image(server: &ServerArgs, image_id: u64, output: Option<PathBuf>) -> Result<()> {
    let data = client(server)?.fetch_image_data(image_id)?;
    let dest = output.unwrap_or_else(|| PathBuf::from(format!("{image_id}.jpg")));
    std::fs::write(&dest, &data).with_context(|| format!("failed to write {}", dest.display()))?;
    println!("Downloaded {} ({} bytes)", dest.display(), data.len());
    Ok(())
}

// ── user / tags / json ──

fn cmd_me(server: &ServerArgs) -> Result<()> {
    let user = client(server)?.fetch_user()?;
    println!("User:    {} (id={})", user.user_name, user.id);
    println!("Email:   {}", user.email);
    println!("Created: {}", user.created_at);
    Ok(())
}

fn cmd_tags(server: &ServerArgs) -> Result<()> {
    for tag in client(server)?.fetch_tag_counts()? {
        println!("  {} ({})", tag.name, tag.count);
    }
    Ok(())
}

fn cmd_json(server: &ServerArgs) -> Result<()> {
    let json = client(server)?.fetch_raw_json()?;
    println!("{}", String::from_utf8_lossy(&json));
    Ok(())
}
