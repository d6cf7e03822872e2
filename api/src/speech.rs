//! Fixed phrases and list formatting shared by the intent handlers.

pub const CARD_TITLE: &str = "Virtual Garden";

pub const WELCOME: &str = "Welcome, you can ask about a specific plant, what to plant at a certain time of year, \
or add what you're growing to your Virtual Garden.";

pub const UNRECOGNISED_PLANT: &str = "Sorry, I don't recognise that plant. You could try using another common name \
for it, or you could choose a similar plant.";

pub const UNKNOWN_PLANT: &str = "Sorry, I don't know about that plant.";

pub const UNRECOGNISED_MONTH: &str = "Sorry, I didn't catch which month you meant. \
Try asking about a month like March or September.";

pub const UNSUPPORTED_INTENT: &str = "Sorry, I can't help with that yet.";

pub const REMOTE_FAILURE: &str = "Sorry, I'm having trouble reaching the plant database right now. \
Please try again in a little while.";

/// How a list of plant names should be spoken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Empty,
    /// Exactly one name, for singular phrasings
    Single(String),
    /// Two or more names, joined as "a, b, and c"
    Many(String),
}

impl Listing {
    pub fn of(items: &[String]) -> Self {
        match items {
            [] => Self::Empty,
            [only] => Self::Single(only.clone()),
            [init @ .., last] => {
                let mut spoken = String::new();
                for item in init {
                    spoken.push_str(item);
                    spoken.push_str(", ");
                }
                spoken.push_str("and ");
                spoken.push_str(last);
                Self::Many(spoken)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn empty_list_has_no_phrase() {
        assert_eq!(Listing::of(&[]), Listing::Empty);
    }

    #[test]
    fn single_item_is_returned_as_is() {
        assert_eq!(
            Listing::of(&names(&["Kale"])),
            Listing::Single("Kale".to_string())
        );
    }

    #[test]
    fn two_items_are_joined_with_and() {
        assert_eq!(
            Listing::of(&names(&["Kale", "Leeks"])),
            Listing::Many("Kale, and Leeks".to_string())
        );
    }

    #[test]
    fn many_items_name_each_once_with_and_before_last_only() {
        let items = names(&["Kale", "Leeks", "Onions", "Garlic"]);
        let Listing::Many(spoken) = Listing::of(&items) else {
            panic!("expected a many-item listing");
        };

        assert_eq!(spoken, "Kale, Leeks, Onions, and Garlic");
        for item in &items {
            assert_eq!(spoken.matches(item.as_str()).count(), 1);
        }
        assert_eq!(spoken.matches("and ").count(), 1);
        assert!(spoken.ends_with("and Garlic"));
    }
}
