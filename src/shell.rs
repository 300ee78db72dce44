// src/shell.rs
// =============================================================================
// The interactive mode: one page on screen, commands read from stdin.
//
// Commands:
//   3            activate item [3]
//   more         load the next page of repositories
//   user NAME    search another profile
//   back         return to the previous page
//   refresh      print the current page again
//   help         list the commands
//   quit         exit
//
// Following a link pushes the new page on a stack, `back` pops it. Pages
// deeper in the stack keep their state (open folders, loaded repos).
// =============================================================================

use crate::pages::{self, Outcome, Page, Session};
use crate::route::Route;
use crate::view::{render, Action, RenderOptions};
use anyhow::{anyhow, Result};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

const HELP: &str = "\
commands:
  <n>          activate item [n]
  more         load more repositories
  user <name>  search a profile
  back         previous page
  refresh      show the page again
  help         this text
  quit         exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Activate(usize),
    More,
    User(String),
    Back,
    Refresh,
    Help,
    Quit,
}

impl Command {
    // Parses one input line; Ok(None) for a blank line
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        if let Ok(n) = line.trim_start_matches('[').trim_end_matches(']').parse::<usize>() {
            return Ok(Some(Command::Activate(n)));
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "more" | "m" => Command::More,
            "user" | "u" => {
                if rest.is_empty() {
                    return Err(anyhow!("usage: user <name>"));
                }
                Command::User(rest.to_string())
            }
            "back" | "b" => Command::Back,
            "refresh" | "r" => Command::Refresh,
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => return Err(anyhow!("unknown command '{}', try 'help'", other)),
        };
        Ok(Some(command))
    }
}

// Activates item [n] of the rendered page
//
// Returns the route to open when the item was an internal link
pub async fn press(
    page: &mut dyn Page,
    session: &Session,
    actions: &[Action],
    n: usize,
) -> Result<Option<Route>> {
    let action = n
        .checked_sub(1)
        .and_then(|i| actions.get(i))
        .cloned()
        .ok_or_else(|| anyhow!("there is no item [{}]", n))?;

    match pages::activate(page, session, action).await {
        Outcome::Stay => Ok(None),
        Outcome::Open(route) => Ok(Some(route)),
        Outcome::External(url) => {
            open_external(&url);
            Ok(None)
        }
    }
}

fn open_external(url: &str) {
    match open::that(url) {
        Ok(()) => debug!(url, "opened in browser"),
        Err(e) => {
            warn!(url, error = %e, "couldn't open browser");
            println!("open this link in your browser: {}", url);
        }
    }
}

// Runs the interactive loop starting at `route`
//
// Returns the page stack's top, so the caller can pick an exit code
pub async fn run(
    session: &Session,
    route: Route,
    options: RenderOptions,
) -> Result<Box<dyn Page>> {
    let mut stack: Vec<Box<dyn Page>> = vec![pages::open(&route, session).await];
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut actions = show(current(&stack)?, &options);

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        debug!(?command, "shell command");

        match command {
            Command::Activate(n) => {
                let page = current_mut(&mut stack)?;
                match press(page, session, &actions, n).await {
                    Ok(Some(route)) => stack.push(pages::open(&route, session).await),
                    Ok(None) => {}
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                }
            }
            Command::More => {
                if !current_mut(&mut stack)?.load_more(session).await {
                    println!("nothing more to load");
                    continue;
                }
            }
            Command::User(name) => {
                if !current_mut(&mut stack)?.submit(session, &name).await {
                    stack.push(
                        pages::open(&Route::Profile { username: Some(name) }, session).await,
                    );
                }
            }
            Command::Back => {
                if stack.len() > 1 {
                    stack.pop();
                } else {
                    println!("already at the first page");
                    continue;
                }
            }
            Command::Refresh => {}
            Command::Help => {
                println!("{}", HELP);
                continue;
            }
            Command::Quit => break,
        }

        actions = show(current(&stack)?, &options);
    }

    stack.pop().ok_or_else(|| anyhow!("no page open"))
}

fn current(stack: &[Box<dyn Page>]) -> Result<&dyn Page> {
    stack
        .last()
        .map(|page| page.as_ref())
        .ok_or_else(|| anyhow!("no page open"))
}

fn current_mut(stack: &mut [Box<dyn Page>]) -> Result<&mut dyn Page> {
    match stack.last_mut() {
        Some(page) => Ok(page.as_mut()),
        None => Err(anyhow!("no page open")),
    }
}

// Prints the page and returns its numbered actions
fn show(page: &dyn Page, options: &RenderOptions) -> Vec<Action> {
    let rendered = render(page.document(), options);
    println!("\n{}", rendered.text);
    rendered.actions
}
