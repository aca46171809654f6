//! CLI blackjack example.
//!
//! Usage: `cargo run --example cli_blackjack -- [stats-file]`

use std::env;
use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use bjsolo::{
    BetDecision, Card, Game, GameError, GameEvent, GameState, Hand, Rank, StatsStore, Suit,
    TableOptions,
};
use tracing::Level;

const DEFAULT_STATS_PATH: &str = "save/save.txt";

fn main() -> Result<(), GameError> {
    let level = env::var("RUST_LOG")
        .ok()
        .and_then(|value| value.trim().parse::<Level>().ok())
        .unwrap_or(Level::WARN);
    tracing_subscriber::fmt().with_max_level(level).init();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_STATS_PATH.to_string());
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let mut game = Game::open(TableOptions::default(), StatsStore::new(path), seed)?;
    game.set_observer(|event| {
        if let GameEvent::StatsNotSaved(err) = event {
            println!("Warning: progress may not be saved ({err}).");
        }
    });

    println!("Blackjack CLI example (type 'q' to quit)");

    loop {
        if game.state() == GameState::Betting {
            print_stats(&game);

            let input = prompt_line("Bet amount: ");
            if input == "q" || input == "quit" {
                println!("Goodbye.");
                return Ok(());
            }

            match game.place_bet(&input)? {
                BetDecision::Accepted(amount) => println!("Betting ${amount}."),
                BetDecision::Rejected { reason, suggested } => {
                    println!("{reason} Try ${suggested}.");
                    continue;
                }
                decision @ BetDecision::Replenished { .. } => {
                    println!("{decision}");
                    continue;
                }
            }
        }

        game.deal()?;

        while game.state() == GameState::PlayerTurn {
            print_table(&game);

            let result = match prompt_line("[h]it or [s]tand: ").as_str() {
                "h" | "hit" => game.hit().map(|_| ()),
                "s" | "stand" => game.stand().map(|_| ()),
                "q" | "quit" => return Ok(()),
                _ => {
                    println!("Unknown action.");
                    continue;
                }
            };

            if let Err(err) = result {
                println!("Action error: {err}");
            }
        }

        if let Some(settlement) = game.last_settlement() {
            print_table(&game);
            println!("{}", settlement.message());
        }
    }
}

fn prompt_line(prompt: &str) -> String {
    print!("{prompt}");
    let _ = io::stdout().flush();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return String::new();
    }
    input.trim().to_lowercase()
}

fn print_stats(game: &Game) {
    let player = game.player();
    println!(
        "\nMoney: ${} | Wins: {} | Losses: {}",
        player.money, player.wins, player.losses
    );
}

fn print_table(game: &Game) {
    let dealer = game.dealer();
    println!("\nDealer: {} (value {})", format_hand(dealer), dealer.total());

    let hand = &game.player().hand;
    println!("Player: {} (value {})\n", format_hand(hand), hand.total());
}

fn format_hand(hand: &Hand) -> String {
    if hand.is_empty() {
        return "(empty)".to_string();
    }
    hand.cards()
        .iter()
        .map(format_card)
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_card(card: &Card) -> String {
    let color_code = match card.suit() {
        Suit::Hearts | Suit::Diamonds => "31",
        Suit::Clubs => "32",
        Suit::Spades => "34",
    };

    let text = card.to_string();
    if matches!(
        card.rank(),
        Rank::Jack | Rank::Queen | Rank::King | Rank::Ace
    ) {
        colorize(&text, &format!("1;{color_code}"))
    } else {
        colorize(&text, color_code)
    }
}

fn colorize(text: &str, code: &str) -> String {
    format!("\u{1b}[{code}m{text}\u{1b}[0m")
}
