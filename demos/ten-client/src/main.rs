use ten::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// One character per slot: the occupying player's id, or `.` if free.
fn render_board(game: &GameData) -> String {
    game.cells()
        .iter()
        .map(|cell| match cell {
            Some(PlayerId(id)) => char::from_digit(u32::from(*id % 10), 10).unwrap_or('#'),
            None => '.',
        })
        .collect()
}

fn status_line(snapshot: &SessionSnapshot) -> String {
    let Some(game) = &snapshot.game else {
        return "waiting for game".into();
    };
    let active = game.active_player_name().unwrap_or("?");
    match game.phase() {
        Phase::WaitingForPlayers => format!(
            "waiting for players ({}/{})",
            game.player_ids().len(),
            game.max_players()
        ),
        Phase::WaitingOnMove if snapshot.is_my_turn() => format!(
            "[{}] your move (1-{})",
            render_board(game),
            game.max_move()
        ),
        Phase::WaitingOnMove => format!("[{}] {active} to move", render_board(game)),
        Phase::GameOver => format!(
            "[{}] game over, {active} filled the board. waiting for restart",
            render_board(game)
        ),
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

enum Command {
    Move(u8),
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim() {
        "q" | "quit" => Some(Command::Quit),
        other => other.parse().ok().map(Command::Move),
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let mut config = ClientConfig::default();
    if let Some(addr) = args.next() {
        config.addr = addr;
    }
    if let Some(name) = args.next() {
        config.player_name = name;
    }
    eprintln!("connecting to {}", config.addr);

    let client = TenClient::builder().config(config).connect().await?;

    // Print every snapshot as a JSON line, with a readable status on stderr.
    let mut snapshots = client.subscribe();
    let printer = tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let snapshot = snapshots.borrow_and_update().clone();
            match serde_json::to_string(&snapshot) {
                Ok(json) => println!("{json}"),
                Err(e) => tracing::warn!(error = %e, "failed to serialize snapshot"),
            }
            eprintln!("{}", status_line(&snapshot));
            if !snapshot.link.is_connected() {
                break;
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Some(Command::Move(amount)) => client.send_player_move(amount).await?,
                    Some(Command::Quit) => break,
                    None => eprintln!("enter a number, or q to quit"),
                }
            }
            _ = client.closed() => break,
        }
    }

    client.shutdown().await;
    let _ = printer.await;
    Ok(())
}
