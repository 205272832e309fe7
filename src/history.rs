#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// Append-only conversation log. The first turn is always the system
/// instruction and is set exactly once at construction; everything after it
/// is appended in exchange order and never removed or reordered.
///
/// The full log is replayed to the model on every request, so the context
/// grows without bound over a session. There is no truncation policy.
#[derive(Debug)]
pub struct History {
    turns: Vec<Turn>,
}

impl History {
    pub fn new(system_text: String) -> Self {
        Self {
            turns: vec![Turn {
                role: Role::System,
                text: system_text,
            }],
        }
    }

    pub fn push_user(&mut self, text: String) {
        self.turns.push(Turn {
            role: Role::User,
            text,
        });
    }

    pub fn push_assistant(&mut self, text: String) {
        self.turns.push(Turn {
            role: Role::Assistant,
            text,
        });
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_history_holds_only_the_system_turn() {
        let history = History::new("be helpful".to_string());
        let turns = history.turns();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role, Role::System);
        assert_eq!(turns[0].text, "be helpful");
    }

    #[test]
    fn test_turns_append_in_exchange_order() {
        let mut history = History::new("sys".to_string());
        history.push_user("question".to_string());
        history.push_assistant("answer".to_string());
        history.push_user("follow-up".to_string());

        let roles: Vec<Role> = history.turns().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(history.turns()[3].text, "follow-up");
    }
}
