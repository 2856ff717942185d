use serde::Serialize;

use crate::{
    config::TableConfig,
    deck::Shoe,
    error::{BetError, PresentError},
    hand::Hand,
    present::{visible_labels, Controls, Presenter, Seat},
};

/// Identity of the current round. Reset and every new deal issue a fresh
/// one, which turns continuations scheduled earlier into no-ops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RoundToken(u64);

impl RoundToken {
    fn next(self) -> Self {
        RoundToken(self.0 + 1)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Idle,
    BetPlaced,
    PlayerTurn,
    DealerTurn,
    Settled,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Task {
    DealerDraw,
    GameOver,
}

/// A continuation the driver must hand back to [`Table::wake`] after
/// `delay_ms`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Wake {
    pub token: RoundToken,
    pub task: Task,
    pub delay_ms: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Blackjack,
    Bust,
    DealerBust,
    DealerWins,
    PlayerWins,
    Push,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSummary {
    pub outcome: Outcome,
    pub bet: i64,
    /// Total wallet change over the round, bonuses included.
    pub net: i64,
    pub player_total: u32,
    pub dealer_total: u32,
    pub player: Hand,
    pub dealer: Hand,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSnapshot {
    pub wallet: i64,
    pub phase: Phase,
    pub token: RoundToken,
    pub bet: Option<i64>,
    pub player: Vec<&'static str>,
    pub dealer: Vec<&'static str>,
    pub player_total: u32,
    /// `None` while the hole card is hidden.
    pub dealer_total: Option<u32>,
    pub last_round: Option<RoundSummary>,
}

/// Reads a bet the way the page's bet field is read: leading whitespace,
/// an optional sign, an optional `0x` prefix, then the leading run of
/// digits. Anything after the digits is ignored and values too large for
/// an `i64` saturate.
pub fn parse_bet(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let (radix, rest) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };
    let end = rest
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return None;
    }
    let value = i64::from_str_radix(digits, radix).unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// One header blackjack session: wallet, the hands on the felt and the
/// round state machine.
pub struct Table<P, S> {
    config: TableConfig,
    presenter: P,
    shoe: S,
    wallet: i64,
    phase: Phase,
    token: RoundToken,
    player: Hand,
    dealer: Hand,
    bet: i64,
    bonus: i64,
    hole_hidden: bool,
    last_round: Option<RoundSummary>,
}

impl<P: Presenter, S: Shoe> Table<P, S> {
    pub fn new(config: TableConfig, presenter: P, shoe: S) -> Self {
        let mut table = Table {
            wallet: config.starting_wallet,
            config,
            presenter,
            shoe,
            phase: Phase::Idle,
            token: RoundToken::default(),
            player: Hand::new(),
            dealer: Hand::new(),
            bet: 0,
            bonus: 0,
            hole_hidden: false,
            last_round: None,
        };
        table.show_wallet();
        table.show_controls(Controls::IDLE);
        table
    }

    pub fn wallet(&self) -> i64 {
        self.wallet
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn token(&self) -> RoundToken {
        self.token
    }

    pub fn player(&self) -> &Hand {
        &self.player
    }

    pub fn dealer(&self) -> &Hand {
        &self.dealer
    }

    pub fn last_round(&self) -> Option<&RoundSummary> {
        self.last_round.as_ref()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn is_active(&self) -> bool {
        matches!(
            self.phase,
            Phase::BetPlaced | Phase::PlayerTurn | Phase::DealerTurn
        )
    }

    /// Starts a round from the raw contents of the bet field.
    pub fn start_round(&mut self, input: &str) -> Result<Option<Wake>, BetError> {
        if self.is_over() {
            return self.reject(BetError::GameOver);
        }
        match parse_bet(input) {
            Some(bet) => self.start_round_with(bet),
            None => self.reject(BetError::Invalid),
        }
    }

    pub fn start_round_with(&mut self, bet: i64) -> Result<Option<Wake>, BetError> {
        if self.is_over() {
            return self.reject(BetError::GameOver);
        }
        if self.phase != Phase::Idle {
            log::debug!("deal ignored during {:?}", self.phase);
            return Err(BetError::RoundInProgress);
        }
        if bet <= 0 {
            return self.reject(BetError::Invalid);
        }
        if bet > self.wallet {
            return self.reject(BetError::InsufficientFunds {
                bet,
                wallet: self.wallet,
            });
        }

        self.token = self.token.next();
        self.bet = bet;
        self.bonus = 0;
        self.enter(Phase::BetPlaced);
        self.show_controls(Controls::LOCKED);

        self.player.clear();
        self.dealer.clear();
        for _ in 0..2 {
            let card = self.shoe.draw();
            self.player.push(card);
        }
        for _ in 0..2 {
            let card = self.shoe.draw();
            self.dealer.push(card);
        }
        self.hole_hidden = true;
        log::debug!(
            "round {} dealt: player {:?} dealer {:?}",
            self.token.get(),
            self.player.cards(),
            self.dealer.cards()
        );
        self.render(Seat::Player);
        self.render(Seat::Dealer);

        if self.player.is_blackjack() {
            let payout = self.bet.saturating_mul(5) / 2;
            self.bonus = payout;
            let wake = self.credit(payout);
            self.message(&format!("BlackJack! +${payout}"));
            self.reveal();
            self.finish(Outcome::Blackjack);
            return Ok(wake);
        }

        self.enter(Phase::PlayerTurn);
        self.show_controls(Controls::PLAYER_TURN);
        Ok(None)
    }

    pub fn hit(&mut self) -> Option<Wake> {
        if self.phase != Phase::PlayerTurn {
            log::debug!("hit ignored during {:?}", self.phase);
            return None;
        }
        let card = self.shoe.draw();
        self.player.push(card);
        log::debug!("player draws {card}, total {}", self.player.total());
        self.render(Seat::Player);

        if self.player.is_bust() {
            let wake = self.credit(-self.bet);
            self.message(&format!("Busted! -${}", self.bet));
            self.reveal();
            self.finish(Outcome::Bust);
            wake
        } else if self.player.total() == 21 {
            let payout = self.bet.saturating_mul(3) / 2;
            self.bonus = payout;
            let wake = self.credit(payout);
            self.message(&format!("21! +${payout}"));
            let next = self.dealer_turn();
            wake.or(next)
        } else {
            None
        }
    }

    pub fn stand(&mut self) -> Option<Wake> {
        if self.phase != Phase::PlayerTurn {
            log::debug!("stand ignored during {:?}", self.phase);
            return None;
        }
        self.dealer_turn()
    }

    /// Runs a scheduled continuation. Continuations from an earlier round,
    /// or whose phase has since moved on, do nothing.
    pub fn wake(&mut self, wake: Wake) -> Option<Wake> {
        if wake.token != self.token {
            log::debug!(
                "stale {:?} for round {} (current {})",
                wake.task,
                wake.token.get(),
                self.token.get()
            );
            return None;
        }
        match wake.task {
            Task::DealerDraw if self.phase == Phase::DealerTurn => self.dealer_draw(),
            Task::GameOver if self.wallet <= 0 && self.phase != Phase::GameOver => {
                self.game_over();
                None
            }
            task => {
                log::debug!("{task:?} ignored during {:?}", self.phase);
                None
            }
        }
    }

    /// Runs continuations back to back, ignoring their delays.
    pub fn drain(&mut self, mut wake: Option<Wake>) {
        while let Some(next) = wake {
            wake = self.wake(next);
        }
    }

    pub fn reset(&mut self) {
        self.wallet = self.config.starting_wallet;
        self.player.clear();
        self.dealer.clear();
        self.bet = 0;
        self.bonus = 0;
        self.hole_hidden = false;
        self.last_round = None;
        self.token = self.token.next();
        self.enter(Phase::Idle);
        log::info!("table reset, wallet {}", self.wallet);

        self.show_wallet();
        self.render(Seat::Player);
        self.render(Seat::Dealer);
        self.show_controls(Controls::IDLE);
        let duration = self.config.reset_message_ms;
        self.message_for("Game reset!", duration);
    }

    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            wallet: self.wallet,
            phase: self.phase,
            token: self.token,
            bet: self.is_active().then_some(self.bet),
            player: visible_labels(&self.player, false),
            dealer: visible_labels(&self.dealer, self.hole_hidden),
            player_total: self.player.total(),
            dealer_total: (!self.hole_hidden).then(|| self.dealer.total()),
            last_round: self.last_round.clone(),
        }
    }

    fn is_over(&self) -> bool {
        self.wallet <= 0 || self.phase == Phase::GameOver
    }

    fn reject(&mut self, err: BetError) -> Result<Option<Wake>, BetError> {
        log::debug!("deal rejected: {err}");
        self.message(err.message());
        Err(err)
    }

    fn dealer_turn(&mut self) -> Option<Wake> {
        self.enter(Phase::DealerTurn);
        self.show_controls(Controls::LOCKED);
        self.reveal();
        if self.dealer.total() < self.config.dealer_stands_on {
            Some(self.schedule(Task::DealerDraw, self.config.dealer_delay_ms))
        } else {
            self.showdown()
        }
    }

    fn dealer_draw(&mut self) -> Option<Wake> {
        let card = self.shoe.draw();
        self.dealer.push(card);
        log::debug!("dealer draws {card}, total {}", self.dealer.total());
        self.render(Seat::Dealer);
        if self.dealer.total() < self.config.dealer_stands_on {
            Some(self.schedule(Task::DealerDraw, self.config.dealer_delay_ms))
        } else {
            self.showdown()
        }
    }

    fn showdown(&mut self) -> Option<Wake> {
        let dealer = self.dealer.total();
        let player = self.player.total();
        let bet = self.bet;
        let (outcome, delta, text) = if self.dealer.is_bust() {
            (Outcome::DealerBust, bet, format!("Dealer busted! +${bet}"))
        } else if dealer > player {
            (Outcome::DealerWins, -bet, format!("Dealer wins -${bet}"))
        } else if dealer < player {
            (Outcome::PlayerWins, bet, format!("You win! +${bet}"))
        } else {
            (Outcome::Push, 0, "Push!".to_string())
        };
        let wake = if delta != 0 { self.credit(delta) } else { None };
        self.message(&text);
        self.finish(outcome);
        wake
    }

    /// Settled, then straight back to Idle.
    fn finish(&mut self, outcome: Outcome) {
        self.enter(Phase::Settled);
        let base = match outcome {
            Outcome::Bust | Outcome::DealerWins => -self.bet,
            Outcome::DealerBust | Outcome::PlayerWins => self.bet,
            Outcome::Blackjack | Outcome::Push => 0,
        };
        let summary = RoundSummary {
            outcome,
            bet: self.bet,
            net: base + self.bonus,
            player_total: self.player.total(),
            dealer_total: self.dealer.total(),
            player: self.player.clone(),
            dealer: self.dealer.clone(),
        };
        log::info!(
            "round {} settled {:?}: player {} dealer {} net {} wallet {}",
            self.token.get(),
            summary.outcome,
            summary.player_total,
            summary.dealer_total,
            summary.net,
            self.wallet
        );
        self.last_round = Some(summary);
        self.enter(Phase::Idle);
        self.show_controls(Controls::IDLE);
    }

    fn game_over(&mut self) {
        self.enter(Phase::GameOver);
        log::info!("game over, wallet {}", self.wallet);
        let duration = self.config.game_over_message_ms;
        self.message_for("GAME OVER!", duration);
        self.show_controls(Controls::LOCKED);
    }

    /// Applies a wallet change and runs the game-over check.
    fn credit(&mut self, delta: i64) -> Option<Wake> {
        self.wallet = self.wallet.saturating_add(delta);
        self.show_wallet();
        if self.wallet <= 0 {
            Some(self.schedule(Task::GameOver, self.config.game_over_delay_ms))
        } else {
            None
        }
    }

    fn schedule(&self, task: Task, delay_ms: u32) -> Wake {
        Wake {
            token: self.token,
            task,
            delay_ms,
        }
    }

    fn reveal(&mut self) {
        if self.hole_hidden {
            self.hole_hidden = false;
            self.render(Seat::Dealer);
        }
    }

    fn enter(&mut self, phase: Phase) {
        log::debug!("{:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    fn render(&mut self, seat: Seat) {
        let result = match seat {
            Seat::Player => self.presenter.render(seat, &self.player, false),
            Seat::Dealer => self.presenter.render(seat, &self.dealer, self.hole_hidden),
        };
        soft_fail("render", result);
    }

    fn message(&mut self, text: &str) {
        let duration = self.config.message_ms;
        self.message_for(text, duration);
    }

    fn message_for(&mut self, text: &str, duration_ms: u32) {
        let result = self.presenter.show_message(text, duration_ms);
        soft_fail("show_message", result);
    }

    fn show_controls(&mut self, controls: Controls) {
        let result = self.presenter.set_controls(controls);
        soft_fail("set_controls", result);
    }

    fn show_wallet(&mut self) {
        let result = self.presenter.set_wallet(self.wallet);
        soft_fail("set_wallet", result);
    }
}

fn soft_fail(call: &str, result: Result<(), PresentError>) {
    if let Err(err) = result {
        log::warn!("{call}: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Card, Card::*, RandomShoe, StackedShoe};

    #[derive(Clone, Debug, PartialEq)]
    enum Event {
        Render(Seat, Vec<Card>, bool),
        Message(String, u32),
        Controls(Controls),
        Wallet(i64),
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
    }

    impl Recorder {
        fn messages(&self) -> Vec<&str> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Message(text, _) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn last_controls(&self) -> Option<Controls> {
            self.events.iter().rev().find_map(|e| match e {
                Event::Controls(c) => Some(*c),
                _ => None,
            })
        }

        fn last_render(&self, seat: Seat) -> Option<(Vec<Card>, bool)> {
            self.events.iter().rev().find_map(|e| match e {
                Event::Render(s, cards, hidden) if *s == seat => Some((cards.clone(), *hidden)),
                _ => None,
            })
        }
    }

    impl Presenter for Recorder {
        fn render(&mut self, seat: Seat, hand: &Hand, hide_hole: bool) -> Result<(), PresentError> {
            self.events
                .push(Event::Render(seat, hand.cards().to_vec(), hide_hole));
            Ok(())
        }

        fn show_message(&mut self, text: &str, duration_ms: u32) -> Result<(), PresentError> {
            self.events.push(Event::Message(text.to_string(), duration_ms));
            Ok(())
        }

        fn set_controls(&mut self, controls: Controls) -> Result<(), PresentError> {
            self.events.push(Event::Controls(controls));
            Ok(())
        }

        fn set_wallet(&mut self, value: i64) -> Result<(), PresentError> {
            self.events.push(Event::Wallet(value));
            Ok(())
        }
    }

    struct Broken;

    impl Presenter for Broken {
        fn render(&mut self, _: Seat, _: &Hand, _: bool) -> Result<(), PresentError> {
            Err(PresentError("missing #bj-player-cards".into()))
        }

        fn show_message(&mut self, _: &str, _: u32) -> Result<(), PresentError> {
            Err(PresentError("no body".into()))
        }

        fn set_controls(&mut self, _: Controls) -> Result<(), PresentError> {
            Err(PresentError("missing #bj-hit".into()))
        }

        fn set_wallet(&mut self, _: i64) -> Result<(), PresentError> {
            Err(PresentError("missing #bj-wallet".into()))
        }
    }

    fn table(cards: &[Card]) -> Table<Recorder, StackedShoe> {
        Table::new(
            TableConfig::default(),
            Recorder::default(),
            StackedShoe::new(cards),
        )
    }

    #[test]
    fn parses_bets_like_the_bet_field() {
        assert_eq!(parse_bet("10"), Some(10));
        assert_eq!(parse_bet("  7"), Some(7));
        assert_eq!(parse_bet("12abc"), Some(12));
        assert_eq!(parse_bet("10.5"), Some(10));
        assert_eq!(parse_bet("+3"), Some(3));
        assert_eq!(parse_bet("-5"), Some(-5));
        assert_eq!(parse_bet("abc"), None);
        assert_eq!(parse_bet(""), None);
        assert_eq!(parse_bet("-"), None);
        assert_eq!(parse_bet("0x10"), Some(16));
        assert_eq!(parse_bet("0Xff"), Some(255));
        assert_eq!(parse_bet("0x"), None);
        assert_eq!(parse_bet("99999999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_bet("-99999999999999999999999"), Some(-i64::MAX));
    }

    #[test]
    fn invalid_bets_leave_table_idle() {
        let mut t = table(&[Ten, Nine, Six, Five]);
        let token = t.token();
        for input in ["0", "abc", "-5", ""] {
            assert_eq!(t.start_round(input), Err(BetError::Invalid));
        }
        assert_eq!(t.wallet(), 100);
        assert_eq!(t.phase(), Phase::Idle);
        assert_eq!(t.token(), token);
        assert!(t.player().is_empty());
        assert_eq!(t.presenter().messages(), vec!["Enter a valid bet!"; 4]);
    }

    #[test]
    fn bet_above_wallet_is_rejected() {
        let mut t = table(&[Ten, Nine, Six, Five]);
        assert_eq!(
            t.start_round("101"),
            Err(BetError::InsufficientFunds {
                bet: 101,
                wallet: 100
            })
        );
        assert_eq!(t.wallet(), 100);
        assert_eq!(t.phase(), Phase::Idle);
        assert_eq!(t.presenter().messages(), vec!["Not enough funds!"]);
    }

    #[test]
    fn oversized_bet_is_short_of_funds() {
        let mut t = table(&[Ten, Nine, Six, Five]);
        assert_eq!(
            t.start_round("99999999999999999999999"),
            Err(BetError::InsufficientFunds {
                bet: i64::MAX,
                wallet: 100
            })
        );
        assert_eq!(t.wallet(), 100);
        assert_eq!(t.phase(), Phase::Idle);
        assert_eq!(t.presenter().messages(), vec!["Not enough funds!"]);
    }

    #[test]
    fn hex_bet_is_accepted() {
        let mut t = table(&[Ten, Two, Six, Five]);
        assert_eq!(t.start_round("0x10"), Ok(None));
        assert_eq!(t.snapshot().bet, Some(16));
    }

    #[test]
    fn deal_hides_dealer_hole_card() {
        let mut t = table(&[Ten, Two, Six, Five]);
        assert_eq!(t.start_round("10"), Ok(None));
        assert_eq!(t.phase(), Phase::PlayerTurn);
        assert_eq!(t.player().cards(), &[Ten, Two]);
        assert_eq!(t.dealer().cards(), &[Six, Five]);
        assert_eq!(
            t.presenter().last_render(Seat::Dealer),
            Some((vec![Six, Five], true))
        );
        assert_eq!(t.presenter().last_controls(), Some(Controls::PLAYER_TURN));

        let snap = t.snapshot();
        assert_eq!(snap.dealer, vec!["6", "?"]);
        assert_eq!(snap.dealer_total, None);
        assert_eq!(snap.bet, Some(10));
        assert_eq!(snap.player_total, 12);
    }

    #[test]
    fn second_deal_during_round_is_refused() {
        let mut t = table(&[Ten, Two, Six, Five]);
        t.start_round("10").unwrap();
        assert_eq!(t.start_round("10"), Err(BetError::RoundInProgress));
        assert_eq!(t.phase(), Phase::PlayerTurn);
        assert_eq!(t.player().cards(), &[Ten, Two]);
    }

    #[test]
    fn natural_blackjack_pays_immediately() {
        let mut t = table(&[Ace, King, Five, Six]);
        assert_eq!(t.start_round("10"), Ok(None));
        assert_eq!(t.wallet(), 125);
        assert_eq!(t.phase(), Phase::Idle);
        assert_eq!(t.dealer().len(), 2);
        assert_eq!(
            t.presenter().last_render(Seat::Dealer),
            Some((vec![Five, Six], false))
        );
        assert!(t.presenter().messages().contains(&"BlackJack! +$25"));
        let summary = t.last_round().unwrap();
        assert_eq!(summary.outcome, Outcome::Blackjack);
        assert_eq!(summary.net, 25);
        assert_eq!(t.presenter().last_controls(), Some(Controls::IDLE));
    }

    #[test]
    fn blackjack_payout_rounds_down() {
        let mut t = table(&[King, Ace, Ten, Ten]);
        t.start_round("5").unwrap();
        assert_eq!(t.wallet(), 112);
    }

    #[test]
    fn bust_loses_bet_without_dealer_draws() {
        let mut t = table(&[Ten, Six, Nine, Seven, King]);
        t.start_round("10").unwrap();
        assert_eq!(t.hit(), None);
        assert_eq!(t.wallet(), 90);
        assert_eq!(t.phase(), Phase::Idle);
        assert_eq!(t.dealer().cards(), &[Nine, Seven]);
        assert!(t.presenter().messages().contains(&"Busted! -$10"));
        assert_eq!(t.last_round().unwrap().outcome, Outcome::Bust);
        assert_eq!(t.snapshot().dealer_total, Some(16));
    }

    #[test]
    fn small_hit_keeps_player_turn() {
        let mut t = table(&[Two, Three, Nine, Seven, Four]);
        t.start_round("10").unwrap();
        assert_eq!(t.hit(), None);
        assert_eq!(t.phase(), Phase::PlayerTurn);
        assert_eq!(t.player().total(), 9);
    }

    #[test]
    fn hitting_21_pays_bonus_then_dealer_plays() {
        let mut t = table(&[Ten, Six, Nine, Seven, Five, Two]);
        t.start_round("10").unwrap();
        let wake = t.hit().expect("dealer should draw");
        assert_eq!(t.wallet(), 115);
        assert_eq!(t.phase(), Phase::DealerTurn);
        assert_eq!(t.presenter().last_controls(), Some(Controls::LOCKED));
        assert_eq!(wake.task, Task::DealerDraw);

        t.drain(Some(wake));
        assert_eq!(t.dealer().total(), 18);
        assert_eq!(t.wallet(), 125);
        let summary = t.last_round().unwrap();
        assert_eq!(summary.outcome, Outcome::PlayerWins);
        assert_eq!(summary.net, 25);
    }

    #[test]
    fn end_to_end_push() {
        let mut t = table(&[Ten, Nine, Six, Five, Eight]);
        t.start_round("10").unwrap();
        let wake = t.stand().expect("dealer on 11 must draw");
        assert_eq!(wake.delay_ms, 300);
        assert_eq!(wake.token, t.token());
        assert_eq!(
            t.presenter().last_render(Seat::Dealer),
            Some((vec![Six, Five], false))
        );

        assert_eq!(t.wake(wake), None);
        assert_eq!(t.dealer().cards(), &[Six, Five, Eight]);
        assert_eq!(t.wallet(), 100);
        assert_eq!(t.phase(), Phase::Idle);
        assert!(t.presenter().messages().contains(&"Push!"));
        assert_eq!(t.last_round().unwrap().outcome, Outcome::Push);
    }

    #[test]
    fn dealer_on_17_settles_at_once() {
        let mut t = table(&[Ten, Eight, Ten, Seven]);
        t.start_round("10").unwrap();
        assert_eq!(t.stand(), None);
        assert_eq!(t.wallet(), 110);
        assert!(t.presenter().messages().contains(&"You win! +$10"));
    }

    #[test]
    fn dealer_wins_on_higher_total() {
        let mut t = table(&[Ten, Seven, Ten, Nine]);
        t.start_round("10").unwrap();
        assert_eq!(t.stand(), None);
        assert_eq!(t.wallet(), 90);
        assert!(t.presenter().messages().contains(&"Dealer wins -$10"));
    }

    #[test]
    fn dealer_bust_pays_player() {
        let mut t = table(&[Ten, Two, Ten, Six, King]);
        t.start_round("10").unwrap();
        let wake = t.stand();
        t.drain(wake);
        assert_eq!(t.dealer().total(), 26);
        assert_eq!(t.wallet(), 110);
        assert_eq!(t.last_round().unwrap().outcome, Outcome::DealerBust);
    }

    #[test]
    fn dealer_always_stops_on_17_or_more() {
        let config = TableConfig {
            starting_wallet: 1_000_000,
            ..TableConfig::default()
        };
        let mut t = Table::new(config, (), RandomShoe::new(2024));
        for round in 0..2_000 {
            t.start_round("1").unwrap();
            let wake = if round % 3 == 0 { t.hit() } else { None };
            let wake = match (wake, t.phase()) {
                (Some(w), _) => Some(w),
                (None, Phase::PlayerTurn) => t.stand(),
                (None, _) => None,
            };
            t.drain(wake);
            assert_eq!(t.phase(), Phase::Idle);
            let summary = t.last_round().unwrap();
            match summary.outcome {
                Outcome::Blackjack | Outcome::Bust => {}
                _ => assert!(summary.dealer_total >= 17, "{summary:?}"),
            }
        }
    }

    #[test]
    fn empty_wallet_ends_game_until_reset() {
        let mut t = table(&[Ten, Six, Ten, Seven, King]);
        t.start_round("100").unwrap();
        let wake = t.hit().expect("game over must be scheduled");
        assert_eq!(wake.task, Task::GameOver);
        assert_eq!(wake.delay_ms, 500);
        assert_eq!(t.wallet(), 0);

        assert_eq!(t.start_round("10"), Err(BetError::GameOver));
        assert_eq!(t.wake(wake), None);
        assert_eq!(t.phase(), Phase::GameOver);
        assert_eq!(t.presenter().last_controls(), Some(Controls::LOCKED));
        assert!(t
            .presenter()
            .events
            .contains(&Event::Message("GAME OVER!".into(), 3_000)));
        assert_eq!(t.start_round("10"), Err(BetError::GameOver));
        assert_eq!(t.hit(), None);

        t.reset();
        assert_eq!(t.wallet(), 100);
        assert_eq!(t.phase(), Phase::Idle);
        let controls = t.presenter().last_controls().unwrap();
        assert!(controls.bet_input);
        assert!(!controls.hit);
        assert!(!controls.stand);
        assert_eq!(t.presenter().last_render(Seat::Player), Some((vec![], false)));
    }

    #[test]
    fn reset_turns_pending_dealer_draw_into_noop() {
        let mut t = table(&[Ten, Nine, Six, Five, Eight]);
        t.start_round("10").unwrap();
        let wake = t.stand().unwrap();
        t.reset();
        assert_eq!(t.wake(wake), None);
        assert!(t.dealer().is_empty());
        assert_eq!(t.wallet(), 100);
        assert_eq!(t.phase(), Phase::Idle);
        assert!(t.last_round().is_none());
    }

    #[test]
    fn reset_turns_pending_game_over_into_noop() {
        let mut t = table(&[Ten, Six, Ten, Seven, King]);
        t.start_round("100").unwrap();
        let wake = t.hit().unwrap();
        t.reset();
        assert_eq!(t.wake(wake), None);
        assert_eq!(t.phase(), Phase::Idle);
        assert_eq!(t.start_round("10"), Ok(None));
    }

    #[test]
    fn actions_outside_player_turn_are_ignored() {
        let mut t = table(&[Ten, Nine, Six, Five]);
        assert_eq!(t.hit(), None);
        assert_eq!(t.stand(), None);
        assert!(t.player().is_empty());
        assert_eq!(t.phase(), Phase::Idle);
    }

    #[test]
    fn broken_presenter_does_not_block_settlement() {
        let mut t = Table::new(
            TableConfig::default(),
            Broken,
            StackedShoe::new(&[Ten, Nine, Six, Five, Eight]),
        );
        t.start_round("10").unwrap();
        let wake = t.stand();
        t.drain(wake);
        assert_eq!(t.phase(), Phase::Idle);
        assert_eq!(t.last_round().unwrap().outcome, Outcome::Push);
        assert_eq!(t.start_round("abc"), Err(BetError::Invalid));
    }

    #[test]
    fn reset_shows_message_and_wallet() {
        let mut t = table(&[Ten, Seven, Ten, Nine]);
        t.start_round("10").unwrap();
        t.stand();
        t.reset();
        let events = &t.presenter().events;
        assert!(events.contains(&Event::Message("Game reset!".into(), 1_500)));
        assert_eq!(
            events.iter().rev().find(|e| matches!(e, Event::Wallet(_))),
            Some(&Event::Wallet(100))
        );
    }
}
