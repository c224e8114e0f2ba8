use anyhow::Error;
use clap::{Arg, ArgMatches, Command};
use log::{debug, info, warn};
use poker_hands::{functional::argmax, parse_hand, Deck, Hand};
use rand::rngs::StdRng;
use serde_json::json;
use std::io::{BufRead, Write};

pub const PROMPT: &str = "> ";

/// What the caller should do after a command is handled.
#[derive(Debug, Eq, PartialEq)]
pub enum Reply {
    Exit,
    Text(String),
}

pub struct App {
    commands: Command,
    deck: Deck,
    json: bool,
    /// Most recently classified hand. It's the first hand of the next
    /// comparison.
    last: Option<Hand>,
    rng: StdRng,
}

impl App {
    fn cards_arg(matches: &ArgMatches) -> String {
        matches
            .get_many::<String>("cards")
            .map(|cards| cards.cloned().collect::<Vec<_>>().join(" "))
            .unwrap_or_default()
    }

    fn classify(&mut self, notation: &str) -> Result<Reply, Error> {
        match parse_hand(notation) {
            Ok(hand) => {
                let content = self.render(&hand)?;
                self.last = Some(hand);
                Ok(Reply::Text(content))
            }
            Err(error) => {
                warn!("rejected {notation:?}: {error}");
                Ok(Reply::Text(format!("error: {error}")))
            }
        }
    }

    fn compare(&mut self, notation: &str) -> Result<Reply, Error> {
        let second = match parse_hand(notation) {
            Ok(hand) => hand,
            Err(error) => {
                warn!("rejected {notation:?}: {error}");
                return Ok(Reply::Text(format!("error: {error}")));
            }
        };
        let Some(first) = self.last.replace(second.clone()) else {
            let content = [
                self.render(&second)?,
                "no earlier hand to compare against; this one is kept for next time".to_string(),
            ]
            .join("\n");
            return Ok(Reply::Text(content));
        };

        let showdown = first.showdown(&second);
        info!("{first} vs {second}: {showdown}");
        let content = if self.json {
            json!({
                "first": first.report(),
                "second": second.report(),
                "result": showdown.to_string(),
            })
            .to_string()
        } else {
            format!("first:  {first}\nsecond: {second}\n{showdown}")
        };
        Ok(Reply::Text(content))
    }

    fn deal(&mut self) -> Result<Reply, Error> {
        match self.deck.deal_hand() {
            Ok(hand) => {
                let content = self.render(&hand)?;
                self.last = Some(hand);
                Ok(Reply::Text(content))
            }
            Err(error) => Ok(Reply::Text(format!(
                "error: {error} (use `shuffle` for a fresh deck)"
            ))),
        }
    }

    pub fn handle_command(&mut self, user_input: &str) -> Result<Reply, Error> {
        let cmd = user_input.split_whitespace();
        match self.commands.clone().try_get_matches_from(cmd) {
            Ok(matches) => match matches.subcommand() {
                Some(("clear", _)) => {
                    self.last = None;
                    Ok(Reply::Text("forgot the last hand".to_string()))
                }
                Some(("compare", matches)) => self.compare(&Self::cards_arg(matches)),
                Some(("deal", _)) => self.deal(),
                Some(("eval", matches)) => self.classify(&Self::cards_arg(matches)),
                Some(("exit", _)) => Ok(Reply::Exit),
                Some(("last", _)) => match self.last.as_ref() {
                    Some(hand) => Ok(Reply::Text(self.render(hand)?)),
                    None => Ok(Reply::Text("no hand yet".to_string())),
                },
                Some(("shuffle", _)) => {
                    self.shuffle();
                    Ok(Reply::Text(format!(
                        "shuffled a fresh deck of {} cards",
                        self.deck.len()
                    )))
                }
                _ => Ok(Reply::Text(String::new())),
            },
            Err(_) => match user_input {
                "help" => Ok(Reply::Text(self.commands.render_help().to_string())),
                // Bare notation is shorthand for `eval`.
                notation if parse_hand(notation).is_ok() => self.classify(notation),
                invalid => Ok(Reply::Text(format!("unrecognized command: {invalid}"))),
            },
        }
    }

    pub fn new(rng: StdRng, json: bool) -> Self {
        let cards = Arg::new("cards")
            .help("Five cards, e.g. `Ah Kh Qh Jh Th` or `A♥ K♥ Q♥ J♥ 10♥`.")
            .num_args(1..)
            .required(true)
            .value_name("CARD");
        let clear = Command::new("clear").about("Forget the last hand.");
        let compare = Command::new("compare")
            .about("Classify a hand and compare it against the last hand.")
            .arg(cards.clone());
        let deal = Command::new("deal").about("Deal and classify a hand from the deck.");
        let eval = Command::new("eval").about("Classify a hand.").arg(cards);
        let exit = Command::new("exit").about("Exit.");
        let last = Command::new("last").about("Display the last hand.");
        let shuffle = Command::new("shuffle").about("Replace the deck with a fresh, shuffled one.");
        let usage = [
            "Enter any of the following to classify or compare five-card poker hands.\n",
            "The typical flow is:",
            "- Classify a hand with `eval CARDS` (or just enter the cards)",
            "- Compare another hand against it with `compare CARDS`",
            "- Deal random hands with `deal` and start over with `shuffle`",
        ]
        .join("\n");
        let commands = Command::new("poker")
            .disable_help_flag(true)
            .disable_version_flag(true)
            .next_line_help(true)
            .no_binary_name(true)
            .override_usage(usage)
            .subcommand(clear)
            .subcommand(compare)
            .subcommand(deal)
            .subcommand(eval)
            .subcommand(exit)
            .subcommand(last)
            .subcommand(shuffle);

        let mut app = Self {
            commands,
            deck: Deck::standard(),
            json,
            last: None,
            rng,
        };
        app.shuffle();
        app
    }

    fn render(&self, hand: &Hand) -> Result<String, Error> {
        if self.json {
            Ok(serde_json::to_string(&hand.report())?)
        } else {
            Ok(hand.to_string())
        }
    }

    /// Read commands line by line until `exit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, reader: R, writer: &mut W) -> Result<(), Error> {
        write!(writer, "{PROMPT}")?;
        writer.flush()?;
        for line in reader.lines() {
            let line = line?;
            let user_input = line.trim();
            if !user_input.is_empty() {
                match self.handle_command(user_input)? {
                    Reply::Exit => break,
                    Reply::Text(content) => writeln!(writer, "{content}")?,
                }
            }
            write!(writer, "{PROMPT}")?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Deal `num_hands` hands from the deck and list them with the
    /// winning hand(s).
    pub fn showdown(&mut self, num_hands: usize) -> Result<String, Error> {
        let hands = (0..num_hands)
            .map(|_| self.deck.deal_hand())
            .collect::<Result<Vec<_>, _>>()?;
        let winners = argmax(&hands);
        debug!("winners of {num_hands} hands: {winners:?}");

        if self.json {
            let reports: Vec<_> = hands.iter().map(Hand::report).collect();
            return Ok(json!({ "hands": reports, "winners": winners }).to_string());
        }
        let mut lines: Vec<String> = hands
            .iter()
            .enumerate()
            .map(|(i, hand)| format!("{:>2}: {hand}", i + 1))
            .collect();
        let winners = winners
            .iter()
            .map(|i| (i + 1).to_string())
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("winner(s): {winners}"));
        Ok(lines.join("\n"))
    }

    fn shuffle(&mut self) {
        self.deck = Deck::standard();
        self.deck.shuffle(&mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use std::io::Cursor;

    use super::{App, Reply};

    fn app() -> App {
        App::new(StdRng::seed_from_u64(1), false)
    }

    fn text(reply: Reply) -> String {
        match reply {
            Reply::Text(content) => content,
            Reply::Exit => panic!("unexpected exit"),
        }
    }

    #[test]
    fn eval_displays_category() {
        let mut app = app();
        let content = text(app.handle_command("eval Ah Kh Qh Jh Th").unwrap());
        assert_eq!(content, "A♥ K♥ Q♥ J♥ 10♥ (Royal Flush)");
        let content = text(app.handle_command("last").unwrap());
        assert!(content.ends_with("(Royal Flush)"));
    }

    #[test]
    fn bare_notation_is_evaluated() {
        let mut app = app();
        let content = text(app.handle_command("7h 7d 7c 7s 9h").unwrap());
        assert!(content.ends_with("(Four of a Kind)"));
    }

    #[test]
    fn bad_notation_is_reported() {
        let mut app = app();
        let content = text(app.handle_command("eval Ah Kh Qh Jh").unwrap());
        assert!(content.starts_with("error: malformed notation"));
        let content = text(app.handle_command("eval Ah Kh Qh Jh 1h").unwrap());
        assert!(content.contains("`1h`"));
        let content = text(app.handle_command("bogus").unwrap());
        assert_eq!(content, "unrecognized command: bogus");
        assert_eq!(text(app.handle_command("last").unwrap()), "no hand yet");
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut app = app();
        for user_input in ["", "   ", "\t \n"] {
            assert_eq!(
                app.handle_command(user_input).unwrap(),
                Reply::Text(String::new())
            );
        }
        assert_eq!(text(app.handle_command("last").unwrap()), "no hand yet");
    }

    #[test]
    fn compare_against_last_hand() {
        let mut app = app();
        let content = text(app.handle_command("compare 5h 4c 3s 2d Ah").unwrap());
        assert!(content.contains("no earlier hand"));
        let content = text(app.handle_command("compare 6h 5c 4s 3d 2h").unwrap());
        assert!(content.ends_with("second wins"));
        let content = text(app.handle_command("compare 6d 5s 4c 3h 2d").unwrap());
        assert!(content.ends_with("tie"));
        let content = text(app.handle_command("compare 8h 8d Ks 4c 2h").unwrap());
        assert!(content.ends_with("first wins"));

        text(app.handle_command("clear").unwrap());
        let content = text(app.handle_command("compare 8h 8d Ks 4c 2h").unwrap());
        assert!(content.contains("no earlier hand"));
    }

    #[test]
    fn deal_until_empty() {
        let mut app = app();
        for _ in 0..10 {
            let content = text(app.handle_command("deal").unwrap());
            assert!(!content.starts_with("error"));
        }
        let content = text(app.handle_command("deal").unwrap());
        assert!(content.starts_with("error: can't deal 5 cards from a deck of 2"));
        let content = text(app.handle_command("shuffle").unwrap());
        assert_eq!(content, "shuffled a fresh deck of 52 cards");
        assert!(!text(app.handle_command("deal").unwrap()).starts_with("error"));
    }

    #[test]
    fn showdown_lists_winners() {
        let content = app().showdown(4).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[4].starts_with("winner(s): "));
        assert!(app().showdown(11).is_err());
    }

    #[test]
    fn json_output() {
        let mut app = App::new(StdRng::seed_from_u64(1), true);
        let content = text(app.handle_command("eval Th Td Ts 4c 4h").unwrap());
        let report: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(report["name"], "Full House");
        assert_eq!(report["key"], serde_json::json!([6, 10, 4]));

        let content = app.showdown(2).unwrap();
        let showdown: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(showdown["hands"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn run_until_exit() {
        let mut app = app();
        let input = Cursor::new("eval Ah Kh Qh Jh Th\n\nexit\neval 2h 3h 4h 5h 6h\n");
        let mut output = Vec::new();
        app.run(input, &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("(Royal Flush)"));
        assert!(!output.contains("(Straight Flush)"));
        assert_eq!(app.handle_command("exit").unwrap(), Reply::Exit);
    }
}
