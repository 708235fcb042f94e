//! Static catalog of Cache2k25 fest events.
//!
//! The catalog is pure presentation data: the registration flow records the
//! event by title, and register links use the URL-safe slug so no query
//! escaping is needed.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventCategory {
    NonTechnical,
    Technical,
}

impl EventCategory {
    pub fn heading(self) -> &'static str {
        match self {
            EventCategory::NonTechnical => "Non-Technical Events",
            EventCategory::Technical => "Technical Events",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CatalogEvent {
    pub title: &'static str,
    pub description: &'static str,
    /// Entry fee in INR.
    pub fee: u32,
    pub slug: &'static str,
    pub image: &'static str,
    pub category: EventCategory,
}

const EVENTS: &[CatalogEvent] = &[
    CatalogEvent {
        title: "Photography Contest",
        description: "Showcase your photography skills and win exciting prizes.",
        fee: 50,
        slug: "photography-contest",
        image: "/imgs/pc.jpg",
        category: EventCategory::NonTechnical,
    },
    CatalogEvent {
        title: "Live Drawing",
        description: "Compete in a live drawing challenge to impress the judges.",
        fee: 50,
        slug: "live-drawing",
        image: "/imgs/ld.jpg",
        category: EventCategory::NonTechnical,
    },
    CatalogEvent {
        title: "Tech Meme Contest",
        description: "Create hilarious tech memes and get recognized for creativity.",
        fee: 50,
        slug: "tech-meme-contest",
        image: "/imgs/tm.jpg",
        category: EventCategory::NonTechnical,
    },
    CatalogEvent {
        title: "BGMI Esports Tournament",
        description: "Battle it out in BGMI and show your esports skills.",
        fee: 200,
        slug: "bgmi-esports",
        image: "/imgs/bgmi.jpg",
        category: EventCategory::NonTechnical,
    },
    CatalogEvent {
        title: "FreeFire Esports Championship",
        description: "Join the FreeFire Championship and win glory.",
        fee: 200,
        slug: "freefire-championship",
        image: "/imgs/ff.jpg",
        category: EventCategory::NonTechnical,
    },
    CatalogEvent {
        title: "Web Development Challenge",
        description: "Build a web app within limited time and showcase your coding skills.",
        fee: 100,
        slug: "web-dev-challenge",
        image: "/imgs/wd.jpg",
        category: EventCategory::Technical,
    },
    CatalogEvent {
        title: "Poster Presentation",
        description: "Present your technical research in an innovative poster format.",
        fee: 100,
        slug: "poster-presentation",
        image: "/imgs/pp.jpg",
        category: EventCategory::Technical,
    },
    CatalogEvent {
        title: "Tech Expo",
        description: "Showcase innovative technical projects to the community.",
        fee: 100,
        slug: "tech-expo",
        image: "/imgs/te.jpeg",
        category: EventCategory::Technical,
    },
    CatalogEvent {
        title: "PyMaster Contest",
        description: "Solve Python challenges and prove your mastery.",
        fee: 50,
        slug: "pymaster-contest",
        image: "/imgs/pmc.jpg",
        category: EventCategory::Technical,
    },
    CatalogEvent {
        title: "Technical Quiz",
        description: "Test your technical knowledge and win amazing prizes.",
        fee: 100,
        slug: "technical-quiz",
        image: "/imgs/tq.jpg",
        category: EventCategory::Technical,
    },
];

pub fn events() -> &'static [CatalogEvent] {
    EVENTS
}

pub fn events_in(category: EventCategory) -> impl Iterator<Item = &'static CatalogEvent> {
    EVENTS.iter().filter(move |event| event.category == category)
}

pub fn find_by_slug(slug: &str) -> Option<&'static CatalogEvent> {
    EVENTS.iter().find(|event| event.slug == slug)
}

pub fn find_by_title(title: &str) -> Option<&'static CatalogEvent> {
    EVENTS.iter().find(|event| event.title == title)
}

/// Resolves a register-link parameter that may be either a slug or a raw
/// event title into the catalog title used for storage.
pub fn resolve_event_param(param: &str) -> Option<&'static str> {
    find_by_slug(param)
        .or_else(|| find_by_title(param))
        .map(|event| event.title)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn slugs_and_titles_are_unique() {
        let slugs: HashSet<_> = events().iter().map(|e| e.slug).collect();
        let titles: HashSet<_> = events().iter().map(|e| e.title).collect();
        assert_eq!(slugs.len(), events().len());
        assert_eq!(titles.len(), events().len());
    }

    #[test]
    fn slugs_are_url_safe() {
        for event in events() {
            assert!(
                event
                    .slug
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "slug {} contains unsafe characters",
                event.slug
            );
        }
    }

    #[test]
    fn categories_split_the_catalog() {
        let non_technical = events_in(EventCategory::NonTechnical).count();
        let technical = events_in(EventCategory::Technical).count();
        assert_eq!(non_technical, 5);
        assert_eq!(technical, 5);
        assert_eq!(non_technical + technical, events().len());
    }

    #[test]
    fn resolve_accepts_slug_or_title() {
        assert_eq!(
            resolve_event_param("photography-contest"),
            Some("Photography Contest")
        );
        assert_eq!(resolve_event_param("Tech Expo"), Some("Tech Expo"));
        assert_eq!(resolve_event_param("unknown-event"), None);
    }
}
