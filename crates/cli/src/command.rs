use crate::output::Renderer;
use anyhow::{bail, Result};
use member_graph::{ExplorerSession, Selection};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const HELP: &str = "\
commands:
  seed NAME...   set the members to start from
  stop NAME...   set the members not to expand past
  clear          drop seeds and stops
  show           print the graph for the current selection
  nodes          list the nodes of the full graph
  quit           leave
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Seed(Vec<String>),
    Stop(Vec<String>),
    Clear,
    Show,
    Nodes,
    Help,
    Quit,
}

/// `Ok(None)` for blank lines and `#` comments
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    if verb.starts_with('#') {
        return Ok(None);
    }
    let rest: Vec<String> = words.map(str::to_string).collect();

    let command = match verb {
        "seed" | "seeds" => Command::Seed(rest),
        "stop" | "stops" => Command::Stop(rest),
        "clear" => Command::Clear,
        "show" => Command::Show,
        "nodes" => Command::Nodes,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("unknown command `{other}` (try `help`)"),
    };
    Ok(Some(command))
}

/// Read commands from `input` until `quit` or end of input.
///
/// Every `show` trims a fresh copy of the session's full graph. Bad commands
/// and unknown members are reported on `out` and the loop continues.
pub async fn run_interactive<R, W>(
    session: &ExplorerSession,
    renderer: &Renderer,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut selection = Selection::default();
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                out.write_all(format!("error: {e}\n").as_bytes()).await?;
                continue;
            }
        };

        match command {
            Command::Seed(names) => selection.seeds = names.into_iter().collect(),
            Command::Stop(names) => selection.stops = names.into_iter().collect(),
            Command::Clear => selection = Selection::default(),
            Command::Show => match session.select(&selection) {
                Ok(graph) => {
                    let text = renderer.render(&graph)?;
                    out.write_all(text.as_bytes()).await?;
                }
                Err(e) => out.write_all(format!("error: {e}\n").as_bytes()).await?,
            },
            Command::Nodes => {
                let mut listing = String::new();
                for key in session.full_graph().node_keys() {
                    listing.push_str(&key);
                    listing.push('\n');
                }
                out.write_all(listing.as_bytes()).await?;
            }
            Command::Help => out.write_all(HELP.as_bytes()).await?,
            Command::Quit => break,
        }
        out.flush().await?;
    }

    Ok(())
}
