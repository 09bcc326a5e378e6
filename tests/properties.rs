//! Property tests for collective invariants and parsing.

use std::time::Duration;

use proptest::prelude::*;

use coffeebot::{
    parse, Closer, Collective, CollectiveError, Command, FixedChooser, JoinOutcome, Timestamp,
    UserId, COMMAND_TABLE,
};

const TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// One step applied to a collective.
#[derive(Clone, Debug)]
enum Op {
    Join(u8),
    Leave(u8),
    Close(u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..8).prop_map(Op::Join),
        1 => (0u8..8).prop_map(Op::Leave),
        1 => (0u8..8).prop_map(Op::Close),
    ]
}

fn name(n: u8) -> UserId {
    UserId::new(format!("user{}", n))
}

proptest! {
    #[test]
    fn prop_membership_invariants(
        capacity in 2usize..6,
        pick in 0usize..16,
        ops in prop::collection::vec(op(), 0..40),
    ) {
        let mut chooser = FixedChooser(pick);
        let mut c = Collective::opened_at(name(0), capacity, TIMEOUT, Timestamp::from_millis(0));
        let mut first_maker: Option<UserId> = None;

        for op in ops {
            let was_closed = c.is_closed();
            let before = c.len();

            let result = match op {
                Op::Join(n) => c.join(name(n), &mut chooser).map(|outcome| {
                    if let JoinOutcome::Filled { .. } = outcome {
                        // Closes exactly when the join fills it
                        assert_eq!(c.len(), capacity);
                    }
                }),
                Op::Leave(n) => c.leave(&name(n)).map(|_| ()),
                Op::Close(n) => c.close(Closer::Member(&name(n)), &mut chooser).map(|_| ()),
            };

            prop_assert!(c.len() <= capacity);
            if was_closed {
                prop_assert_eq!(result, Err(CollectiveError::AlreadyClosed));
                prop_assert_eq!(c.len(), before);
            }
            if !c.is_closed() {
                prop_assert!(c.len() < capacity);
                prop_assert!(c.maker().is_none());
            }
            if let Some(maker) = c.maker() {
                prop_assert!(c.contains(maker));
                if let Some(ref first) = first_maker {
                    prop_assert_eq!(first, maker);
                }
                first_maker = Some(maker.clone());
            }
            if let Some(leader) = c.leader() {
                prop_assert!(c.contains(leader));
            }
        }
    }

    #[test]
    fn prop_parse_is_deterministic(text in "\\PC{0,60}") {
        prop_assert_eq!(parse(&text), parse(&text));
    }

    #[test]
    fn prop_quoted_phrasings_unrecognized(
        entry in 0usize..7,
        variant in 0usize..3,
        quote in prop::sample::select(vec!['`', '\'', '"']),
    ) {
        let (_, phrasings) = COMMAND_TABLE[entry];
        let phrasing = phrasings[variant % phrasings.len()];
        let text = format!("{q}@**coffeebot** {p}{q}", q = quote, p = phrasing);
        prop_assert_eq!(parse(&text), Command::Unrecognized);
    }

    #[test]
    fn prop_unquoted_phrasings_recognized(
        entry in 0usize..7,
        variant in 0usize..3,
        prefix in "[a-z ]{0,10}",
    ) {
        let (command, phrasings) = COMMAND_TABLE[entry];
        let phrasing = phrasings[variant % phrasings.len()];
        let text = format!("{} @**coffeebot** {}", prefix, phrasing);
        prop_assert_eq!(parse(&text), command);
    }
}
