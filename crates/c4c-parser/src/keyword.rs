//! Reserved words of the language.

use std::fmt;

/// A reserved word. Matching is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Workspace,
    Extends,
    Model,
    Views,
    View,
    Person,
    SoftwareSystem,
    Container,
    Component,
    Group,
    Perspectives,
    Tags,
    Description,
    Name,
    Properties,
    Technology,
    Url,
    This,
    Style,
}

const ALL: [Keyword; 19] = [
    Keyword::Workspace,
    Keyword::Extends,
    Keyword::Model,
    Keyword::Views,
    Keyword::View,
    Keyword::Person,
    Keyword::SoftwareSystem,
    Keyword::Container,
    Keyword::Component,
    Keyword::Group,
    Keyword::Perspectives,
    Keyword::Tags,
    Keyword::Description,
    Keyword::Name,
    Keyword::Properties,
    Keyword::Technology,
    Keyword::Url,
    Keyword::This,
    Keyword::Style,
];

impl Keyword {
    /// Looks up `text` as a keyword, ignoring ASCII case.
    pub fn lookup(text: &str) -> Option<Self> {
        ALL.into_iter()
            .find(|keyword| keyword.as_str().eq_ignore_ascii_case(text))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Workspace => "workspace",
            Keyword::Extends => "extends",
            Keyword::Model => "model",
            Keyword::Views => "views",
            Keyword::View => "view",
            Keyword::Person => "person",
            Keyword::SoftwareSystem => "softwaresystem",
            Keyword::Container => "container",
            Keyword::Component => "component",
            Keyword::Group => "group",
            Keyword::Perspectives => "perspectives",
            Keyword::Tags => "tags",
            Keyword::Description => "description",
            Keyword::Name => "name",
            Keyword::Properties => "properties",
            Keyword::Technology => "technology",
            Keyword::Url => "url",
            Keyword::This => "this",
            Keyword::Style => "style",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(Keyword::lookup("SoftwareSystem"), Some(Keyword::SoftwareSystem));
        assert_eq!(Keyword::lookup("WORKSPACE"), Some(Keyword::Workspace));
        assert_eq!(Keyword::lookup("views"), Some(Keyword::Views));
        assert_eq!(Keyword::lookup("view"), Some(Keyword::View));
    }

    #[test]
    fn test_lookup_rejects_non_keywords() {
        assert_eq!(Keyword::lookup("foobar"), None);
        assert_eq!(Keyword::lookup("model1"), None);
        assert_eq!(Keyword::lookup(""), None);
    }

    #[test]
    fn test_round_trip_names() {
        for keyword in ALL {
            assert_eq!(Keyword::lookup(keyword.as_str()), Some(keyword));
        }
    }
}
