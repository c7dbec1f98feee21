//! Local running rules shown as an accordion

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rule {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
}

pub static RULES: [Rule; 3] = [
    Rule {
        id: 1,
        title: "Bike Paths are Lava",
        description: "Do not run on red paths. You will get hit. Cyclists in Amsterdam are fast \
                      and silent. Stay on the sidewalk or designated pedestrian areas.",
    },
    Rule {
        id: 2,
        title: "Tram Tracks",
        description: "Cross at 90-degree angles. Do not get your foot stuck. Trams have priority \
                      and cannot stop quickly. Always look both ways.",
    },
    Rule {
        id: 3,
        title: "Canal Safety",
        description: "There are no railings. Watch your step at night. The water is cold and \
                      getting out is difficult. Keep a safe distance from the edge.",
    },
];

/// At most one rule is expanded at a time
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Accordion {
    open: Option<u32>,
}

impl Accordion {
    /// Open `id`, or close it if it is already open
    pub fn toggle(&mut self, id: u32) {
        self.open = if self.open == Some(id) { None } else { Some(id) };
    }

    pub fn is_open(&self, id: u32) -> bool {
        self.open == Some(id)
    }

    pub fn open_rule(&self) -> Option<&'static Rule> {
        let id = self.open?;
        RULES.iter().find(|rule| rule.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_opens_and_closes() {
        let mut accordion = Accordion::default();
        accordion.toggle(1);
        assert!(accordion.is_open(1));
        accordion.toggle(1);
        assert!(!accordion.is_open(1));
        assert!(accordion.open_rule().is_none());
    }

    #[test]
    fn test_opening_another_closes_previous() {
        let mut accordion = Accordion::default();
        accordion.toggle(1);
        accordion.toggle(3);
        assert!(!accordion.is_open(1));
        assert_eq!(accordion.open_rule().unwrap().title, "Canal Safety");
    }
}
