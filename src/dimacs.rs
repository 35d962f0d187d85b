use std::error::Error;

pub struct Dimacs;

impl Dimacs {
    /// Parse DIMACS text into clauses of signed integers.
    ///
    /// Comment (`c`), problem (`p`) and benchmark-trailer (`%`) lines are
    /// skipped, as is any line left without literals once the terminating
    /// `0` is dropped.
    pub fn parse(input: &str) -> Result<Vec<Vec<i32>>, Box<dyn Error>> {
        input
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| !line.starts_with('c'))
            .filter(|line| !line.starts_with('p'))
            .filter(|line| !line.starts_with('%'))
            .map(|line| -> Result<_, Box<dyn Error>> {
                line.split_whitespace()
                    .map(|n| n.parse::<i32>().map_err(|e| Box::new(e) as Box<dyn Error>))
                    .filter(|n| !matches!(n, Ok(0)))
                    .collect::<Result<Vec<_>, _>>()
            })
            .filter(|clause| !matches!(clause, Ok(c) if c.is_empty()))
            .collect::<Result<Vec<_>, _>>()
    }
}
