use anyhow::Result;
use clap::Parser;
use dataset_verify::frontend::{self, Action, Frontend};
use dataset_verify::logging;
use dataset_verify::session::{
    Direction, FolderRole, MessageLevel, Session, SessionState, StatusMessage, View,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Browse image/text pairs, fix captions and copy approved pairs.
#[derive(Parser)]
#[command(name = "review")]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(long)]
    images: Option<PathBuf>,

    #[arg(long)]
    texts: Option<PathBuf>,

    /// Destination folder for approved images
    #[arg(long)]
    dest_images: Option<PathBuf>,

    /// Destination folder for approved texts
    #[arg(long)]
    dest_texts: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

const HELP: &str = "\
commands:
  images|texts|dest-images|dest-texts <dir>   select a folder
  n | next, p | prev                          move between images
  edit, text <caption>, save                  edit the caption
  copy                                        copy the pair to the destinations
  q | quit";

struct Terminal<R> {
    input: R,
}

impl<R: BufRead> Terminal<R> {
    fn parse(line: &str) -> Option<Action> {
        let (command, arg) = match line.split_once(' ') {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };
        let folder = |role| {
            (!arg.is_empty()).then(|| Action::SelectFolder(role, PathBuf::from(arg)))
        };

        match command {
            "images" => folder(FolderRole::Images),
            "texts" => folder(FolderRole::Texts),
            "dest-images" => folder(FolderRole::DestImages),
            "dest-texts" => folder(FolderRole::DestTexts),
            "n" | "next" => Some(Action::Navigate(Direction::Next)),
            "p" | "prev" => Some(Action::Navigate(Direction::Previous)),
            "copy" => Some(Action::Promote),
            "edit" => Some(Action::EditText),
            "text" => Some(Action::ReplaceText(arg.to_string())),
            "save" => Some(Action::SaveText),
            "q" | "quit" => Some(Action::Quit),
            _ => None,
        }
    }
}

impl<R: BufRead> Frontend for Terminal<R> {
    fn render(&mut self, view: &View, message: Option<&StatusMessage>) {
        println!();
        if let Some(message) = message {
            let marker = match message.level {
                MessageLevel::Success => "ok",
                MessageLevel::Error => "!!",
            };
            println!("[{}] {}: {}", marker, message.title, message.text);
        }

        match view.state {
            SessionState::Idle => println!("Select an image folder and a text folder."),
            _ => match &view.image_path {
                Some(path) => {
                    let dims = image::image_dimensions(path)
                        .map(|(w, h)| format!("{}x{}", w, h))
                        .unwrap_or_else(|_| "unreadable".to_string());
                    println!(
                        "[{}/{}] {} ({})",
                        view.cursor + 1,
                        view.image_count,
                        path.display(),
                        dims
                    );
                    if let Some(text) = &view.text {
                        println!("{}", text.as_str());
                    }
                    if view.state == SessionState::Editing {
                        println!("(editing: `text <caption>` then `save`)");
                    }
                }
                None => println!("Images: 0 files"),
            },
        }

        if let Some(count) = view.dest_image_count {
            println!("Destination images: {} files", count);
        }
        if let Some(count) = view.dest_text_count {
            println!("Destination texts: {} files", count);
        }
    }

    fn next_action(&mut self, _view: &View) -> Option<Action> {
        loop {
            print!("> ");
            io::stdout().flush().ok()?;

            let mut line = String::new();
            if self.input.read_line(&mut line).ok()? == 0 {
                return None;
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match Self::parse(line) {
                Some(action) => return Some(action),
                None => println!("{}", HELP),
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut session = Session::new();
    let preselected = [
        (FolderRole::Images, cli.images),
        (FolderRole::Texts, cli.texts),
        (FolderRole::DestImages, cli.dest_images),
        (FolderRole::DestTexts, cli.dest_texts),
    ];
    for (role, path) in preselected {
        if let Some(path) = path {
            frontend::dispatch(&mut session, Action::SelectFolder(role, path));
        }
    }

    println!("{}", HELP);
    let mut terminal = Terminal {
        input: io::stdin().lock(),
    };
    frontend::run(&mut session, &mut terminal);

    Ok(())
}
