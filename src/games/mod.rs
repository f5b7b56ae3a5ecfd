pub mod decoder;
pub mod hoops;
pub mod pi;
pub mod snake;
pub mod twentyfour;

pub struct GameDescriptor
{
    pub name: &'static str,
    pub description: &'static str,
}

pub fn registry() -> Vec<GameDescriptor>
{
    vec![
        GameDescriptor {
            name: snake::NAME,
            description: "Classic snake with smooth gliding between tiles",
        },
        GameDescriptor {
            name: hoops::NAME,
            description: "Aim and shoot a basketball at the hoop",
        },
        GameDescriptor {
            name: pi::NAME,
            description: "How many digits of Pi do you know?",
        },
        GameDescriptor {
            name: decoder::NAME,
            description: "Crack substitution ciphers or build your own",
        },
        GameDescriptor {
            name: twentyfour::NAME,
            description: "Combine four cards to make 24",
        },
    ]
}

pub fn find(name: &str) -> Option<GameDescriptor>
{
    registry()
        .into_iter()
        .find(|game| game.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_registry_names_are_unique()
    {
        let registry = registry();
        assert_eq!(registry.len(), 5);
        for (index, game) in registry.iter().enumerate() {
            assert!(registry[index + 1..].iter().all(|other| other.name != game.name));
        }
    }

    #[test]
    fn test_find_ignores_case()
    {
        assert_eq!(find("SNAKE").map(|game| game.name), Some("snake"));
        assert!(find("wordle").is_none());
    }
}
