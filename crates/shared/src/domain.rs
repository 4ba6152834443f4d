use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Conference,
    Workshop,
    Meetup,
    Hackathon,
    Webinar,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        EventType::Conference,
        EventType::Workshop,
        EventType::Meetup,
        EventType::Hackathon,
        EventType::Webinar,
    ];

    /// Label shown in the type selector and the read-only type field.
    pub fn name(self) -> &'static str {
        match self {
            EventType::Conference => "CONFERENCE",
            EventType::Workshop => "WORKSHOP",
            EventType::Meetup => "MEETUP",
            EventType::Hackathon => "HACKATHON",
            EventType::Webinar => "WEBINAR",
        }
    }

    pub fn from_name(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(raw.trim()))
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Name,
    Location,
    Date,
    StartTime,
    EndTime,
    Description,
    Price,
    Type,
    Link,
    ImageUri,
}

impl DraftField {
    pub const ALL: [DraftField; 10] = [
        DraftField::Name,
        DraftField::Location,
        DraftField::Date,
        DraftField::StartTime,
        DraftField::EndTime,
        DraftField::Description,
        DraftField::Price,
        DraftField::Type,
        DraftField::Link,
        DraftField::ImageUri,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DraftField::Name => "Nom de l'événement",
            DraftField::Location => "Lieu de l'événement",
            DraftField::Date => "Date de l'événement",
            DraftField::StartTime => "Heure de début",
            DraftField::EndTime => "Heure de fin",
            DraftField::Description => "Description de l'événement",
            DraftField::Price => "Prix",
            DraftField::Type => "Type",
            DraftField::Link => "Lien de l'événement (facultatif)",
            DraftField::ImageUri => "Image",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Home,
    Bookmark,
    Profile,
}

impl Destination {
    pub const TABS: [Destination; 3] = [
        Destination::Home,
        Destination::Bookmark,
        Destination::Profile,
    ];

    pub fn route(self) -> &'static str {
        match self {
            Destination::Home => "home",
            Destination::Bookmark => "bookmark",
            Destination::Profile => "profile",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Destination::Home => "Accueil",
            Destination::Bookmark => "Agenda",
            Destination::Profile => "Profil",
        }
    }

    pub fn from_route(route: &str) -> Option<Self> {
        Self::TABS
            .into_iter()
            .find(|destination| destination.route() == route.trim())
    }
}
