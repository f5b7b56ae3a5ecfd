use super::expr::Ratio;

#[derive(Clone)]
struct Term
{
    value: Ratio,
    text: String,
    atomic: bool,
}

impl Term
{
    fn wrapped(&self) -> String
    {
        if self.atomic {
            self.text.clone()
        } else {
            format!("({})", self.text)
        }
    }
}

fn combinations(a: &Term, b: &Term) -> Vec<Term>
{
    let mut out = Vec::with_capacity(6);
    let mut push = |value: Option<Ratio>, text: String| {
        if let Some(value) = value {
            out.push(Term {
                value,
                text,
                atomic: false,
            });
        }
    };
    let (x, y) = (a.wrapped(), b.wrapped());
    push(a.value.checked_add(b.value).ok(), format!("{x} + {y}"));
    push(a.value.checked_mul(b.value).ok(), format!("{x} * {y}"));
    push(a.value.checked_sub(b.value).ok(), format!("{x} - {y}"));
    push(b.value.checked_sub(a.value).ok(), format!("{y} - {x}"));
    push(a.value.checked_div(b.value).ok(), format!("{x} / {y}"));
    push(b.value.checked_div(a.value).ok(), format!("{y} / {x}"));
    out
}

fn search(terms: &[Term], target: i64) -> Option<String>
{
    if let [only] = terms {
        return only.value.equals_int(target).then(|| only.text.clone());
    }
    for i in 0..terms.len() {
        for j in (i + 1)..terms.len() {
            let rest: Vec<Term> = terms
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != i && *index != j)
                .map(|(_, term)| term.clone())
                .collect();
            for combined in combinations(&terms[i], &terms[j]) {
                let mut next = rest.clone();
                next.push(combined);
                if let Some(solution) = search(&next, target) {
                    return Some(solution);
                }
            }
        }
    }
    None
}

/// Finds one way to reach `target` using every value exactly once.
pub fn solve(values: &[i64], target: i64) -> Option<String>
{
    if values.is_empty() {
        return None;
    }
    let terms: Vec<Term> = values
        .iter()
        .map(|value| Term {
            value: Ratio::from_int(*value),
            text: value.to_string(),
            atomic: true,
        })
        .collect();
    search(&terms, target)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::games::twentyfour::expr::evaluate;

    fn assert_valid(values: &[i64], solution: &str)
    {
        let evaluation = evaluate(solution).unwrap();
        assert!(evaluation.value.equals_int(24), "{solution}");
        let mut used = evaluation.numbers.clone();
        used.sort_unstable();
        let mut expected = values.to_vec();
        expected.sort_unstable();
        assert_eq!(used, expected);
    }

    #[test]
    fn test_finds_simple_solution()
    {
        let values = [6, 6, 6, 6];
        let solution = solve(&values, 24).unwrap();
        assert_valid(&values, &solution);
    }

    #[test]
    fn test_needs_fractions()
    {
        let values = [3, 3, 8, 8];
        let solution = solve(&values, 24).unwrap();
        assert_valid(&values, &solution);

        let values = [1, 5, 5, 5];
        let solution = solve(&values, 24).unwrap();
        assert_valid(&values, &solution);
    }

    #[test]
    fn test_unsolvable_hands()
    {
        assert_eq!(solve(&[1, 1, 1, 1], 24), None);
        assert_eq!(solve(&[13, 13, 13, 13], 24), None);
        assert_eq!(solve(&[], 24), None);
    }

    #[test]
    fn test_other_targets()
    {
        assert_eq!(solve(&[7], 7), Some("7".to_string()));
        assert!(solve(&[1, 2, 3, 4], 10).is_some());
    }
}
