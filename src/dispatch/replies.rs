//! User-facing reply texts.
//!
//! Everything the bot says lives here so the dispatcher reads as control
//! flow. `mention` is always the bot's own mention token.

use crate::types::UserId;

/// Reaction acknowledging a join or a leave.
pub const ACK_SYMBOL: &str = "thumbs_up";

/// Reactions the bot picks from when it is shown some love.
pub const LOVE_SYMBOLS: &[&str] = &[
    "heart",
    "yellow_heart",
    "green_heart",
    "blue_heart",
    "two_hearts",
    "revolving_hearts",
];

/// Public cheer, one of the things the bot may say when shown some love.
pub const CHEER: &str = "    \\o/\n     |\n    /_\\";

/// Usage text sent in reply to private messages.
pub fn help(bot_name: &str, capacity: usize) -> String {
    let title = capitalize(bot_name);
    let mention = format!("@**{}**", bot_name);
    format!(
        "\
Overview:

{title} organizes collectives, groups of people who want coffee. When a collective \
has enough members, it closes, selecting someone to make coffee for the whole collective.

{title} acts when it is publicly mentioned with a command. On private message, {title} \
replies with this usage text. {title} tries to stay quiet: for valid commands it usually \
just reacts with :thumbs_up:, and it explains what went wrong when a request can't be honored.

Usage:

- \"{mention} init\"

Open a collective in this thread, with you as the leader.

- \"{mention} yes\"

Join the open collective. By joining you affirm you want coffee, and are willing to make \
coffee for up to {others} others.

- \"{mention} no\"

Leave the collective. Once a collective is closed, you cannot leave it.

- \"{mention} close\"

Close the collective and choose a maker. Only members may close it.

- \"{mention} ping\"

Tell everyone in the closed collective that coffee is ready. Only the maker may do this.

- \"{mention} state\"

Show the members of the collective, when it was created and how long until it times out.
",
        title = title,
        mention = mention,
        others = capacity.saturating_sub(1),
    )
}

pub(crate) fn opened(mention: &str, capacity: usize) -> String {
    format!(
        "You've initialized a coffee collective! :tada:\n\n\
         This collective can take {} other members (join by typing \"{m} yes\" or \
         \"{m} join\"). For more usage details, send me a private message.",
        capacity.saturating_sub(1),
        m = mention,
    )
}

pub(crate) fn already_open(mention: &str) -> String {
    format!(
        "The collective in this thread is still open. If you'd like, join this one with \
         \"{} yes\" or start your own in some other thread.",
        mention
    )
}

pub(crate) fn nothing_to_join(mention: &str) -> String {
    format!(
        "There is no recently active collective in this thread. Make a new one with \
         \"{} init\"!\n\nFor further details, send me a private message.",
        mention
    )
}

pub(crate) fn closed_to_joins(mention: &str) -> String {
    format!(
        "This collective is closed. Start your own with \"{} init\".\n\n\
         For further details, send me a private message.",
        mention
    )
}

pub(crate) fn already_member() -> String {
    "You're already in this collective. Coffeebot appreciates the enthusiasm, though.".to_string()
}

pub(crate) fn closed_to_leaves(maker: Option<&UserId>) -> String {
    match maker {
        Some(maker) => format!(
            "No one can leave a closed collective. You are free to forfeit your coffee of \
             course, just let the coffee maker, {}, know.",
            maker
        ),
        None => "No one can leave a closed collective.".to_string(),
    }
}

pub(crate) fn disbanded() -> String {
    "Since everyone has left this collective, it is now closed.".to_string()
}

pub(crate) fn already_closed() -> String {
    "This collective is already closed!".to_string()
}

pub(crate) fn maker_chosen(maker: Option<&UserId>, mention: &str) -> String {
    match maker {
        Some(maker) => format!(
            "Coffeebot has deliberated and has chosen {} as the coffee maker.\n\n\
             Once you are done making coffee, ping the members of this collective with \
             \"{} ping\" in this thread.",
            maker.mention(),
            mention
        ),
        None => "This collective is closed, but nobody is left to make coffee.".to_string(),
    }
}

pub(crate) fn timed_out(maker: Option<&UserId>, mention: &str) -> String {
    match maker {
        Some(maker) => format!(
            "This collective has timed out. Coffeebot has chosen {} as the maker.\n\n\
             Once you are done making coffee, ping the members of this collective with \
             \"{} ping\".",
            maker.mention(),
            mention
        ),
        None => "This collective has timed out with nobody in it.".to_string(),
    }
}

pub(crate) fn not_closed_yet() -> String {
    "This collective isn't closed yet, so Coffeebot sees no reason to ping it.".to_string()
}

pub(crate) fn nothing_to_ping() -> String {
    "There is no closed collective in this thread, so Coffeebot sees no reason to ping."
        .to_string()
}

pub(crate) fn maker_only(maker: Option<&UserId>) -> String {
    match maker {
        Some(maker) => format!("Only {} (the coffee maker) may ping.", maker),
        None => "Only the coffee maker may ping, and this collective has none.".to_string(),
    }
}

pub(crate) fn coffee_ready(roster: &str) -> String {
    format!("**Coffee is ready!**\n\n{}", roster)
}

pub(crate) fn nothing_known() -> String {
    "Coffeebot does not know anything about the collectives in this thread. \
     Coffeebot has no persistent storage. :cry:"
        .to_string()
}

pub(crate) fn not_understood() -> String {
    "This request wasn't understood. Message me for usage details.".to_string()
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
