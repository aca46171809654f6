//! Game integration tests.

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use bjsolo::{
    BetDecision, BetRejection, Card, DECK_SIZE, Game, GameError, GameEvent, GameState, Hand,
    Outcome, Party, Rank, RetryPolicy, RoundMessage, Shoe, StatsError, StatsRecord,
    StatsStore, Suit, TableOptions,
};
use tempfile::TempDir;

const fn card(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit)
}

fn shoe_from_draws(draws: &[Rank]) -> Shoe {
    let suits = Suit::ALL.iter().cycle();
    Shoe::stacked(
        draws.iter().zip(suits).map(|(&rank, &suit)| card(rank, suit)),
        0,
    )
}

fn store_in(dir: &TempDir) -> StatsStore {
    StatsStore::new(dir.path().join("save.txt")).with_retry(RetryPolicy::no_retry())
}

fn open_with(dir: &TempDir, options: TableOptions, draws: &[Rank]) -> Game {
    let mut game = Game::open(options, store_in(dir), 7).unwrap();
    game.set_shoe(shoe_from_draws(draws)).unwrap();
    game
}

fn saved(dir: &TempDir) -> StatsRecord {
    store_in(dir).load().unwrap()
}

#[test]
fn open_creates_missing_record() {
    let dir = tempfile::tempdir().unwrap();
    let game = Game::open(TableOptions::default(), store_in(&dir), 1).unwrap();

    assert_eq!(game.player().money, 200);
    assert_eq!(game.state(), GameState::Betting);
    assert_eq!(game.cards_remaining(), DECK_SIZE);
    assert_eq!(saved(&dir), StatsRecord::new(200, 0, 0));
}

#[test]
fn open_loads_existing_record() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("save.txt"), "wins 4\nmoney 315\nlosses 6\n").unwrap();

    let game = Game::open(TableOptions::default(), store_in(&dir), 1).unwrap();
    assert_eq!(game.player().money, 315);
    assert_eq!(game.player().wins, 4);
    assert_eq!(game.player().losses, 6);
}

#[test]
fn open_rejects_malformed_record() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("save.txt"), "money ??\nwins 0\nlosses 0\n").unwrap();

    let err = Game::open(TableOptions::default(), store_in(&dir), 1)
        .err()
        .unwrap();
    assert!(matches!(
        err,
        GameError::Stats(StatsError::Malformed { line: 1, .. })
    ));
}

#[test]
fn actions_require_the_right_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = open_with(&dir, TableOptions::default(), &[]);

    assert!(matches!(game.deal(), Err(GameError::InvalidState)));
    assert!(matches!(game.hit(), Err(GameError::InvalidState)));
    assert!(matches!(game.stand(), Err(GameError::InvalidState)));

    game.place_bet("10").unwrap();
    assert!(matches!(game.place_bet("10"), Err(GameError::InvalidState)));
}

#[test]
fn rejected_bet_keeps_betting_open() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = open_with(&dir, TableOptions::default(), &[]);

    let decision = game.place_bet("150").unwrap();
    assert_eq!(
        decision,
        BetDecision::Rejected {
            reason: BetRejection::AboveMaximum { maximum: 100 },
            suggested: 100,
        }
    );
    assert_eq!(game.state(), GameState::Betting);

    assert_eq!(game.place_bet("100").unwrap(), BetDecision::Accepted(100));
    assert_eq!(game.state(), GameState::ReadyToDeal);
    assert_eq!(game.player().bet, 100);
}

#[test]
fn broke_player_is_topped_up_when_betting() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("save.txt"), "money 5\nwins 0\nlosses 9\n").unwrap();
    let mut game = open_with(&dir, TableOptions::default(), &[]);

    assert_eq!(
        game.place_bet("20").unwrap(),
        BetDecision::Rejected {
            reason: BetRejection::InsufficientFunds,
            suggested: 5,
        }
    );
    assert_eq!(
        game.place_bet("5").unwrap(),
        BetDecision::Replenished { money: 200 }
    );
    assert_eq!(game.player().money, 200);
    assert_eq!(game.state(), GameState::Betting);
}

#[test]
fn dealer_wins_after_stand() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = open_with(
        &dir,
        TableOptions::default(),
        &[Rank::Nine, Rank::Ten, Rank::Seven, Rank::Queen],
    );

    game.place_bet("20").unwrap();
    game.deal().unwrap();
    assert_eq!(game.state(), GameState::PlayerTurn);
    assert_eq!(game.dealer().len(), 1);
    assert_eq!(game.player().hand.total(), 17);

    let settlement = game.stand().unwrap();
    assert_eq!(settlement.outcome(), Outcome::DealerWins);
    assert_eq!(settlement.message(), RoundMessage::DealerWon);
    assert_eq!(settlement.dealer_total, 19);
    assert_eq!(settlement.money(), 180);
    assert!(settlement.is_saved());

    assert_eq!(game.state(), GameState::Betting);
    assert_eq!(game.player().losses, 1);
    assert_eq!(saved(&dir), StatsRecord::new(180, 0, 1));
}

#[test]
fn player_wins_when_dealer_busts() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = open_with(
        &dir,
        TableOptions::default(),
        &[
            Rank::Six,  // dealer
            Rank::Ten,  // player
            Rank::Five, // player
            Rank::Four, // player hit
            Rank::Ten,  // dealer second card
            Rank::Nine, // dealer draws on 16
        ],
    );

    game.place_bet("30").unwrap();
    game.deal().unwrap();
    let hit = game.hit().unwrap();
    assert_eq!(hit.rank(), Rank::Four);
    assert_eq!(game.state(), GameState::PlayerTurn);

    let settlement = game.stand().unwrap();
    assert_eq!(settlement.outcome(), Outcome::PlayerWins);
    assert_eq!(settlement.dealer_total, 25);
    assert_eq!(settlement.resolution.payout, 30);
    assert_eq!(settlement.money(), 230);
    assert_eq!(saved(&dir), StatsRecord::new(230, 1, 0));
}

#[test]
fn natural_settles_on_deal() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = open_with(
        &dir,
        TableOptions::default(),
        &[Rank::Five, Rank::Ace, Rank::King],
    );

    game.place_bet("25").unwrap();
    game.deal().unwrap();

    assert_eq!(game.state(), GameState::Betting);
    let settlement = game.last_settlement().unwrap();
    assert_eq!(settlement.outcome(), Outcome::PlayerWins);
    assert_eq!(settlement.resolution.payout, 37);
    assert_eq!(game.player().money, 237);
    assert_eq!(game.player().wins, 1);
    assert!(matches!(game.hit(), Err(GameError::InvalidState)));
}

#[test]
fn bust_on_hit_settles_without_dealer_play() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = open_with(
        &dir,
        TableOptions::default(),
        &[Rank::Five, Rank::Ten, Rank::Six, Rank::King],
    );

    game.place_bet("50").unwrap();
    game.deal().unwrap();
    game.hit().unwrap();

    let settlement = game.last_settlement().unwrap();
    assert_eq!(settlement.player_total, 26);
    assert_eq!(settlement.outcome(), Outcome::DealerWins);
    assert_eq!(game.dealer().len(), 1);
    assert_eq!(game.player().money, 150);
}

#[test]
fn soft_hand_reaching_twenty_one_settles() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = open_with(
        &dir,
        TableOptions::default(),
        &[Rank::Five, Rank::Ace, Rank::Two, Rank::Eight],
    );

    game.place_bet("10").unwrap();
    game.deal().unwrap();
    assert_eq!(game.player().hand.total(), 13);
    game.hit().unwrap();
    assert_eq!(game.state(), GameState::Betting);
    assert_eq!(game.player().hand.total(), 21);
    assert_eq!(game.last_settlement().unwrap().outcome(), Outcome::PlayerWins);
}

#[test]
fn ace_king_ace_is_a_bust() {
    let mut hand = Hand::new();
    for rank in [Rank::Ace, Rank::King, Rank::Ace] {
        hand.add_card(card(rank, Suit::Spades));
    }
    assert_eq!(hand.total(), 22);
    assert!(hand.is_bust());
}

#[test]
fn ruinous_loss_replenishes_money() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("save.txt"), "money 20\nwins 0\nlosses 0\n").unwrap();
    let mut game = open_with(
        &dir,
        TableOptions::default(),
        &[Rank::Ten, Rank::Nine, Rank::Eight, Rank::Eight],
    );

    game.place_bet("15").unwrap();
    game.deal().unwrap();
    let settlement = game.stand().unwrap();

    assert_eq!(settlement.message(), RoundMessage::Replenished);
    assert_eq!(
        settlement.message().to_string(),
        "You ran out of money, but here's some more!"
    );
    assert_eq!(game.player().money, 200);
    assert_eq!(saved(&dir), StatsRecord::new(200, 0, 1));
}

#[test]
fn dealer_reaching_twenty_one_wins() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = open_with(
        &dir,
        TableOptions::default(),
        &[Rank::Ace, Rank::Ten, Rank::Nine, Rank::King, Rank::Two],
    );

    game.place_bet("40").unwrap();
    game.deal().unwrap();
    let settlement = game.stand().unwrap();

    assert_eq!(settlement.outcome(), Outcome::DealerWins);
    assert_eq!(settlement.dealer_total, 21);
    assert_eq!(game.dealer().len(), 2);
    assert_eq!(game.player().money, 160);
    assert_eq!(saved(&dir), StatsRecord::new(160, 0, 1));
}

#[test]
fn empty_shoe_abandons_round() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = open_with(
        &dir,
        TableOptions::default(),
        &[Rank::Five, Rank::Two, Rank::Three],
    );

    game.place_bet("10").unwrap();
    game.deal().unwrap();
    assert!(matches!(game.hit(), Err(GameError::EmptyShoe(_))));
    assert_eq!(game.state(), GameState::ReadyToDeal);
    assert!(game.player().hand.is_empty());
    assert_eq!(game.player().bet, 10);
}

#[test]
fn next_round_uses_a_fresh_shoe() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = open_with(
        &dir,
        TableOptions::default(),
        &[Rank::Nine, Rank::Ten, Rank::Seven, Rank::Queen],
    );

    game.place_bet("10").unwrap();
    game.deal().unwrap();
    game.stand().unwrap();

    game.place_bet("10").unwrap();
    game.deal().unwrap();
    assert_eq!(game.cards_remaining(), DECK_SIZE - 3);
}

#[test]
fn failed_save_keeps_in_memory_result() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = open_with(
        &dir,
        TableOptions::default(),
        &[Rank::Six, Rank::Ten, Rank::Nine, Rank::Ten, Rank::Ten],
    );
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    game.set_observer(move |event| {
        if let GameEvent::StatsNotSaved(err) = event {
            sink.borrow_mut().push(err.to_string());
        }
    });

    game.place_bet("10").unwrap();
    game.deal().unwrap();
    fs::remove_file(dir.path().join("save.txt")).unwrap();

    let settlement = game.stand().unwrap();
    assert_eq!(settlement.outcome(), Outcome::PlayerWins);
    assert!(matches!(
        settlement.persist_error,
        Some(StatsError::Unavailable { .. })
    ));
    assert_eq!(game.player().money, 210);
    assert_eq!(game.player().wins, 1);
    assert_eq!(events.borrow().len(), 1);
}

#[test]
fn observer_sees_the_whole_round() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = open_with(
        &dir,
        TableOptions::default(),
        &[Rank::Nine, Rank::Ten, Rank::Seven, Rank::Queen],
    );
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    game.set_observer(move |event| {
        let entry = match event {
            GameEvent::BetDecided(decision) => format!("bet {decision}"),
            GameEvent::CardDealt { party, card } => match party {
                Party::Dealer => format!("dealer {card}"),
                Party::Player => format!("player {card}"),
            },
            GameEvent::StatsNotSaved(err) => format!("unsaved {err}"),
            GameEvent::RoundSettled(settlement) => format!("settled {}", settlement.message()),
        };
        sink.borrow_mut().push(entry);
    });

    game.place_bet("20").unwrap();
    game.deal().unwrap();
    game.stand().unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "bet Bet placed: $20",
            "dealer 9C",
            "player 10D",
            "player 7H",
            "dealer QS",
            "settled The dealer won!",
        ]
    );
}
