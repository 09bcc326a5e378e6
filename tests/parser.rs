//! Integration tests for command parsing through the public API.

use coffeebot::{parse, Command, CommandParser, Config, COMMAND_TABLE};

#[test]
fn test_default_parser_table() {
    let cases = [
        ("@**coffeebot** init", Command::Init),
        ("@**coffeebot** start", Command::Init),
        ("@**coffeebot** yes", Command::Join),
        ("@**coffeebot** join", Command::Join),
        ("@**coffeebot** no", Command::Leave),
        ("@**coffeebot** leave", Command::Leave),
        ("@**coffeebot** state", Command::State),
        ("@**coffeebot** status", Command::State),
        ("@**coffeebot** ping", Command::Ping),
        ("@**coffeebot** close", Command::Close),
        ("@**coffeebot** done", Command::Close),
        ("@**coffeebot** stop", Command::Close),
        ("@**coffeebot** love", Command::Love),
        ("@**coffeebot** dance", Command::Unrecognized),
        ("", Command::Unrecognized),
    ];
    for (text, expected) in cases {
        assert_eq!(parse(text), expected, "text {:?}", text);
    }
}

#[test]
fn test_command_on_later_line() {
    let text = "morning all\n\n@**coffeebot** yes\nsee you there";
    assert_eq!(parse(text), Command::Join);
}

#[test]
fn test_quoted_command_on_every_line_ignored() {
    let text = "type `@**coffeebot** init`\nor '@**coffeebot** yes'";
    assert_eq!(parse(text), Command::Unrecognized);
}

#[test]
fn test_parser_for_configured_bot_name() {
    let config = Config {
        bot_name: "brewmaster".to_string(),
        ..Default::default()
    };
    let parser = CommandParser::new(&config.mention(), COMMAND_TABLE).unwrap();

    assert_eq!(parser.parse("@**Brewmaster** ping"), Command::Ping);
    assert_eq!(parser.parse("@**coffeebot** ping"), Command::Unrecognized);
    assert_eq!(parser.len(), 13);
}

#[test]
fn test_parse_is_deterministic() {
    let text = "@**coffeebot** close\n@**coffeebot** init";
    let first = parse(text);
    for _ in 0..10 {
        assert_eq!(parse(text), first);
    }
    assert_eq!(first, Command::Init);
}
