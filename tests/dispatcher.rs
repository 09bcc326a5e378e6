//! End-to-end tests for event dispatch.
//!
//! Drives a `Dispatcher` with chat events and checks the notifications it
//! produces, using a fixed maker election and a manual clock.

use std::time::Duration;

use coffeebot::{
    Clock, Config, Dispatcher, Event, FixedChooser, LocationKey, ManualClock, MessageId,
    Notification, PrivateMessage, PublicMessage, RandomChooser, Timestamp, UserId,
};

const FIFTEEN_MINUTES: Duration = Duration::from_secs(15 * 60);

fn here() -> LocationKey {
    LocationKey::new("coffee", "brew")
}

fn bot_with_capacity(capacity: usize) -> (Dispatcher, ManualClock) {
    let clock = ManualClock::new(Timestamp::from_millis(0));
    let config = Config {
        capacity,
        ..Default::default()
    };
    let bot = Dispatcher::new(config)
        .unwrap()
        .with_chooser(FixedChooser(0))
        .with_clock(clock.clone());
    (bot, clock)
}

fn bot() -> (Dispatcher, ManualClock) {
    bot_with_capacity(3)
}

fn message(id: u64, sender: &str, content: &str) -> PublicMessage {
    PublicMessage {
        id: MessageId(id),
        location: here(),
        sender: UserId::new(sender),
        sender_is_self: false,
        mentions_bot: true,
        content: content.to_string(),
    }
}

fn say(bot: &mut Dispatcher, id: u64, sender: &str, command: &str) -> Vec<Notification> {
    let content = format!("@**coffeebot** {}", command);
    bot.handle(&Event::PublicMessage(message(id, sender, &content)))
}

/// Text of the single public reply in `out`.
fn only_reply(out: &[Notification]) -> &str {
    assert_eq!(out.len(), 1, "expected one notification, got {:?}", out);
    match &out[0] {
        Notification::PublicReply { location, content } => {
            assert_eq!(location, &here());
            content
        }
        other => panic!("expected public reply, got {:?}", other),
    }
}

fn ack(id: u64) -> Notification {
    Notification::reaction(MessageId(id), "thumbs_up")
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_init_then_second_init_refused() {
    let (mut bot, _) = bot();

    let out = say(&mut bot, 1, "alice", "init");
    assert!(only_reply(&out).contains("initialized a coffee collective"));

    let collective = bot.registry().get(&here()).unwrap();
    assert!(!collective.is_closed());
    assert_eq!(
        collective.members().collect::<Vec<_>>(),
        vec![&UserId::new("alice")]
    );

    let out = say(&mut bot, 2, "bob", "init");
    assert!(only_reply(&out).contains("still open"));
    assert_eq!(
        bot.registry().get(&here()).unwrap().leader(),
        Some(&UserId::new("alice"))
    );
}

#[test]
fn test_join_fills_and_elects() {
    let (bot, _) = bot_with_capacity(2);
    let mut bot = bot.with_chooser(RandomChooser::seeded(3));

    say(&mut bot, 1, "a", "init");
    let out = say(&mut bot, 2, "b", "join");

    assert_eq!(out.len(), 2);
    assert_eq!(out[0], ack(2));
    let announcement = out[1].content().unwrap();
    assert!(announcement.contains("as the coffee maker"));

    let collective = bot.registry().get(&here()).unwrap();
    assert!(collective.is_closed());
    let maker = collective.maker().unwrap();
    assert!(maker == &UserId::new("a") || maker == &UserId::new("b"));
    assert!(announcement.contains(&maker.mention()));
}

#[test]
fn test_drained_collective_is_forgotten() {
    let (mut bot, _) = bot();
    say(&mut bot, 1, "a", "init");

    let out = say(&mut bot, 2, "a", "leave");
    assert_eq!(out.len(), 2);
    assert_eq!(out[0], ack(2));
    assert!(out[1].content().unwrap().contains("everyone has left"));
    assert!(bot.registry().get(&here()).is_none());

    let out = say(&mut bot, 3, "a", "ping");
    assert!(only_reply(&out).contains("no closed collective"));

    let out = say(&mut bot, 4, "a", "state");
    assert!(only_reply(&out).contains("does not know anything"));
}

#[test]
fn test_only_maker_may_ping() {
    let (mut bot, _) = bot_with_capacity(2);
    say(&mut bot, 1, "a", "init");
    say(&mut bot, 2, "b", "yes");
    // FixedChooser(0) picks the first member in name order
    assert_eq!(
        bot.registry().get(&here()).unwrap().maker(),
        Some(&UserId::new("a"))
    );

    let out = say(&mut bot, 3, "b", "ping");
    assert_eq!(only_reply(&out), "Only a (the coffee maker) may ping.");

    let out = say(&mut bot, 4, "a", "ping");
    assert_eq!(only_reply(&out), "**Coffee is ready!**\n\n@**a** @**b**");
}

#[test]
fn test_heartbeat_times_out_once() {
    let (mut bot, clock) = bot();
    say(&mut bot, 1, "alice", "init");
    say(&mut bot, 2, "bob", "yes");

    clock.advance(FIFTEEN_MINUTES - Duration::from_millis(1));
    let early = bot.handle(&Event::Heartbeat { now: clock.now() });
    assert!(early.is_empty());

    clock.advance(Duration::from_millis(1));
    let out = bot.handle(&Event::Heartbeat { now: clock.now() });
    let text = only_reply(&out);
    assert!(text.contains("timed out"));
    assert!(text.contains("@**alice**"));

    let collective = bot.registry().get(&here()).unwrap();
    assert!(collective.is_closed());
    assert_eq!(collective.maker(), Some(&UserId::new("alice")));

    let again = bot.handle(&Event::Heartbeat { now: clock.now() });
    assert!(again.is_empty());
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_own_messages_ignored() {
    let (mut bot, _) = bot();
    let mut own = message(1, "coffeebot", "@**coffeebot** init");
    own.sender_is_self = true;
    assert!(bot.handle(&Event::PublicMessage(own)).is_empty());
    assert!(bot.registry().is_empty());

    let private = Event::PrivateMessage(PrivateMessage {
        sender: UserId::new("coffeebot"),
        sender_is_self: true,
        content: "help".to_string(),
    });
    assert!(bot.handle(&private).is_empty());
}

#[test]
fn test_unaddressed_messages_ignored() {
    let (mut bot, _) = bot();
    let mut chatter = message(1, "alice", "@**coffeebot** init");
    chatter.mentions_bot = false;
    assert!(bot.handle(&Event::PublicMessage(chatter)).is_empty());
    assert!(bot.registry().is_empty());
}

#[test]
fn test_quoted_command_is_not_executed() {
    let (mut bot, _) = bot();
    let out = bot.handle(&Event::PublicMessage(message(
        1,
        "alice",
        "just type `@**coffeebot** init`",
    )));
    assert!(only_reply(&out).contains("wasn't understood"));
    assert!(bot.registry().is_empty());
}

#[test]
fn test_private_message_gets_help() {
    let (mut bot, _) = bot();
    let out = bot.handle(&Event::PrivateMessage(PrivateMessage {
        sender: UserId::new("alice"),
        sender_is_self: false,
        content: "what do you do?".to_string(),
    }));
    assert_eq!(out.len(), 1);
    match &out[0] {
        Notification::PrivateReply { recipient, content } => {
            assert_eq!(recipient, &UserId::new("alice"));
            assert!(content.contains("\"@**coffeebot** init\""));
        }
        other => panic!("expected private reply, got {:?}", other),
    }
}

#[test]
fn test_custom_help_text() {
    let config = Config {
        help_text: Some("Ask in #coffee".to_string()),
        ..Default::default()
    };
    let mut bot = Dispatcher::new(config).unwrap();
    let out = bot.handle(&Event::PrivateMessage(PrivateMessage {
        sender: UserId::new("alice"),
        sender_is_self: false,
        content: "hi".to_string(),
    }));
    assert_eq!(out[0].content(), Some("Ask in #coffee"));
}

// ============================================================================
// Refusals and silence
// ============================================================================

#[test]
fn test_join_without_collective() {
    let (mut bot, _) = bot();
    let out = say(&mut bot, 1, "bob", "yes");
    assert!(only_reply(&out).contains("no recently active collective"));
}

#[test]
fn test_join_twice() {
    let (mut bot, _) = bot();
    say(&mut bot, 1, "alice", "init");
    let out = say(&mut bot, 2, "alice", "join");
    assert!(only_reply(&out).contains("already in this collective"));
}

#[test]
fn test_join_closed_collective() {
    let (mut bot, _) = bot_with_capacity(2);
    say(&mut bot, 1, "alice", "init");
    say(&mut bot, 2, "bob", "join");
    let out = say(&mut bot, 3, "carol", "join");
    assert!(only_reply(&out).contains("This collective is closed"));
}

#[test]
fn test_leave_closed_names_maker() {
    let (mut bot, _) = bot_with_capacity(2);
    say(&mut bot, 1, "alice", "init");
    say(&mut bot, 2, "bob", "join");
    let out = say(&mut bot, 3, "bob", "leave");
    let text = only_reply(&out);
    assert!(text.contains("No one can leave a closed collective"));
    assert!(text.contains("alice"));
}

#[test]
fn test_leave_and_close_are_silent_when_pointless() {
    let (mut bot, _) = bot();
    assert!(say(&mut bot, 1, "alice", "leave").is_empty());
    assert!(say(&mut bot, 2, "alice", "close").is_empty());

    say(&mut bot, 3, "alice", "init");
    assert!(say(&mut bot, 4, "mallory", "leave").is_empty());
    assert!(say(&mut bot, 5, "mallory", "close").is_empty());
    assert!(!bot.registry().get(&here()).unwrap().is_closed());
}

#[test]
fn test_leader_leaving_keeps_collective() {
    let (mut bot, _) = bot();
    say(&mut bot, 1, "alice", "init");
    say(&mut bot, 2, "bob", "join");

    let out = say(&mut bot, 3, "alice", "no");
    assert_eq!(out, vec![ack(3)]);

    let collective = bot.registry().get(&here()).unwrap();
    assert!(collective.leader().is_none());
    assert_eq!(collective.len(), 1);
}

#[test]
fn test_close_then_close_again() {
    let (mut bot, _) = bot_with_capacity(5);
    say(&mut bot, 1, "alice", "init");
    say(&mut bot, 2, "bob", "yes");

    let out = say(&mut bot, 3, "bob", "done");
    let text = only_reply(&out);
    assert!(text.contains("@**alice**"));
    assert!(text.contains("as the coffee maker"));

    let out = say(&mut bot, 4, "alice", "close");
    assert_eq!(only_reply(&out), "This collective is already closed!");
}

#[test]
fn test_ping_while_open() {
    let (mut bot, _) = bot();
    say(&mut bot, 1, "alice", "init");
    let out = say(&mut bot, 2, "alice", "ping");
    assert!(only_reply(&out).contains("isn't closed yet"));
}

#[test]
fn test_init_replaces_closed_collective() {
    let (mut bot, _) = bot_with_capacity(2);
    say(&mut bot, 1, "alice", "init");
    say(&mut bot, 2, "bob", "join");
    let first = bot.registry().get(&here()).unwrap().id();

    let out = say(&mut bot, 3, "carol", "init");
    assert!(only_reply(&out).contains("initialized"));

    let second = bot.registry().get(&here()).unwrap();
    assert_ne!(second.id(), first);
    assert!(!second.is_closed());
    assert_eq!(second.leader(), Some(&UserId::new("carol")));
}

// ============================================================================
// State
// ============================================================================

#[test]
fn test_state_reports_open_collective() {
    let (mut bot, clock) = bot();
    say(&mut bot, 1, "alice", "init");
    say(&mut bot, 2, "bob", "yes");

    clock.advance(Duration::from_secs(5 * 60));
    let out = say(&mut bot, 3, "carol", "status");
    let text = only_reply(&out);
    assert!(text.contains("Members: alice, bob"));
    assert!(text.contains("Positions left: 1"));
    assert!(text.contains("Time created: Thursday, 12:00:00 AM UTC"));
    assert!(text.contains("Until timeout: 10 minutes"));
}

#[test]
fn test_state_reports_closing_soon() {
    let (mut bot, clock) = bot();
    say(&mut bot, 1, "alice", "init");
    clock.advance(FIFTEEN_MINUTES - Duration::from_secs(30));
    let out = say(&mut bot, 2, "alice", "state");
    assert!(only_reply(&out).contains("Status: Closing soon!"));
}

#[test]
fn test_locations_do_not_interfere() {
    let (mut bot, _) = bot();
    say(&mut bot, 1, "alice", "init");

    let mut elsewhere = message(2, "bob", "@**coffeebot** init");
    elsewhere.location = LocationKey::new("coffee", "decaf");
    let out = bot.handle(&Event::PublicMessage(elsewhere));
    assert_eq!(out.len(), 1);
    assert_eq!(bot.registry().len(), 2);
    assert_eq!(bot.registry().open_count(), 2);
}

#[test]
fn test_heartbeat_sweeps_every_stale_location() {
    let (mut bot, clock) = bot();
    for (id, topic) in [(1, "decaf"), (2, "brew")] {
        let mut msg = message(id, "alice", "@**coffeebot** init");
        msg.location = LocationKey::new("coffee", topic);
        bot.handle(&Event::PublicMessage(msg));
    }
    say(&mut bot, 3, "bob", "yes");
    say(&mut bot, 4, "alice", "no");

    clock.advance(Duration::from_secs(60 * 60));
    let out = bot.handle(&Event::Heartbeat { now: clock.now() });

    // One announcement per location, in location order
    let locations: Vec<&LocationKey> = out
        .iter()
        .map(|n| match n {
            Notification::PublicReply { location, .. } => location,
            other => panic!("expected public reply, got {:?}", other),
        })
        .collect();
    assert_eq!(
        locations,
        vec![&here(), &LocationKey::new("coffee", "decaf")]
    );
    assert!(out[0].content().unwrap().contains("@**bob**"));

    assert_eq!(bot.registry().open_count(), 0);
    for (_, collective) in bot.registry().iter() {
        let maker = collective.maker().unwrap();
        assert!(collective.contains(maker));
        if let Some(leader) = collective.leader() {
            assert!(collective.contains(leader));
        }
    }
    assert!(bot
        .registry()
        .get(&here())
        .unwrap()
        .leader()
        .is_none());
}
