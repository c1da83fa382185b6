//! Choice and answer value objects
//!
//! Choices are offered to list-like prompts; answers carry the result of a
//! finished prompt together with the question that produced it.

/// A selectable option: display text plus an opaque value
#[derive(Debug, Clone)]
pub struct Choice<T = ()> {
    /// Text shown to the user
    pub name: String,
    /// Value handed back when the choice is selected
    pub data: T,
}

impl Choice<()> {
    /// Create a display-only choice
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: (),
        }
    }
}

impl<T> Choice<T> {
    /// Create a choice carrying a value
    pub fn with_data(name: impl Into<String>, data: T) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Display text with surrounding whitespace removed
    pub fn label(&self) -> &str {
        self.name.trim()
    }
}

impl From<&str> for Choice<()> {
    fn from(name: &str) -> Self {
        Choice::new(name)
    }
}

impl From<String> for Choice<()> {
    fn from(name: String) -> Self {
        Choice::new(name)
    }
}

/// A choice picked from an offered list, identified by its position
#[derive(Debug, Clone)]
pub struct Selected<T = ()> {
    /// Position of the choice in the offered list
    pub index: usize,
    /// The chosen option
    pub choice: Choice<T>,
}

impl<T> Selected<T> {
    pub fn new(index: usize, choice: Choice<T>) -> Self {
        Self { index, choice }
    }

    pub fn name(&self) -> &str {
        &self.choice.name
    }

    pub fn data(&self) -> &T {
        &self.choice.data
    }
}

impl<T> PartialEq for Selected<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Selected<T> {}

/// The result of a completed prompt
#[derive(Debug, Clone, PartialEq)]
pub struct Answer<V> {
    /// Question text of the prompt that produced this answer
    pub question: String,
    /// Answered value
    pub value: V,
}

impl<V> Answer<V> {
    pub fn new(question: impl Into<String>, value: V) -> Self {
        Self {
            question: question.into(),
            value,
        }
    }

    /// Take the answered value, dropping the question
    pub fn into_value(self) -> V {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_from_str() {
        let choice: Choice = "  Apple ".into();
        assert_eq!(choice.name, "  Apple ");
        assert_eq!(choice.label(), "Apple");
    }

    #[test]
    fn test_selected_equality_is_positional() {
        let a = Selected::new(1, Choice::with_data("same", 10));
        let b = Selected::new(1, Choice::with_data("other", 20));
        let c = Selected::new(2, Choice::with_data("same", 10));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_answer_into_value() {
        let answer = Answer::new("Name?", "bob".to_string());
        assert_eq!(answer.question, "Name?");
        assert_eq!(answer.into_value(), "bob");
    }
}
