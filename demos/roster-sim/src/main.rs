//! Simulated game host driving a file-backed player registry.
//!
//! Usage: `roster-sim [config.json] [rounds]`
//!
//! Each round a random seat joins, connects, disconnects or renames.
//! Run it twice against the same data directory to watch names carry
//! over between "server restarts".

use std::sync::{Arc, Mutex};

use rand::Rng;
use rollcall::prelude::*;

// ---------------------------------------------------------------------------
// Host entity
// ---------------------------------------------------------------------------

const SEATS: u64 = 8;
const NAMES: &[&str] = &[
    "Ada", "Alex", "Alexa", "Bo", "Cy", "Dee", "Nova", "Orion", "Zed",
];

struct Seat {
    slot: u64,
    name: Mutex<String>,
}

impl Seat {
    fn rename(&self, name: &str) {
        if let Ok(mut current) = self.name.lock() {
            *current = name.to_owned();
        }
    }
}

impl GameEntity for Seat {
    type Handle = u64;

    fn handle(&self) -> u64 {
        self.slot
    }

    fn name(&self) -> String {
        self.name.lock().map(|n| n.clone()).unwrap_or_default()
    }
}

fn random_name(rng: &mut impl Rng) -> &'static str {
    NAMES[rng.random_range(0..NAMES.len())]
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), RollcallError> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => RollcallConfig::from_file(path)?,
        None => RollcallConfig::default(),
    };
    let rounds: usize = args.next().and_then(|r| r.parse().ok()).unwrap_or(40);

    rollcall::logging::init(&config.log_filter)?;

    let (players, task) =
        spawn_registry(config.open_registry::<Seat>(), config.channel_size);

    let mut rng = rand::rng();
    let seats: Vec<Arc<Seat>> = (0..SEATS)
        .map(|slot| {
            Arc::new(Seat {
                slot,
                name: Mutex::new(random_name(&mut rng).to_owned()),
            })
        })
        .collect();

    for _ in 0..rounds {
        let seat = &seats[rng.random_range(0..seats.len())];
        match rng.random_range(0..4) {
            0 => {
                players.join(Arc::clone(seat)).await?;
            }
            1 => {
                players.connect(Arc::clone(seat)).await?;
            }
            2 => {
                players.disconnect(Arc::clone(seat)).await?;
            }
            _ => {
                // Renames only reach the records on the next join.
                seat.rename(random_name(&mut rng));
                players.join(Arc::clone(seat)).await?;
            }
        }
    }

    let all = players.all_players().await?;
    let online = players.connected_players().await?;
    tracing::info!(known = all.len(), online = online.len(), "simulation finished");

    for query in ["alex", "nova", "3"] {
        let unique = players.find_player(query).await?;
        let matches = players.find_players(query).await?;
        tracing::info!(
            query,
            unique = ?unique.as_ref().map(|p| p.name().to_owned()),
            matches = matches.len(),
            "search"
        );
    }

    players.shutdown().await?;
    if let Err(e) = task.await {
        tracing::error!(error = %e, "registry task panicked");
    }
    Ok(())
}
