use super::schema::CocktailRow;

/// Columns of the `cocktails` table a predicate can look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Category,
    Alcoholic,
    Glass,
    Instructions,
    Iba,
    IngredientsJson,
    TagsJson,
}

impl Column {
    pub fn as_sql(self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Category => "category",
            Column::Alcoholic => "alcoholic",
            Column::Glass => "glass",
            Column::Instructions => "instructions",
            Column::Iba => "iba",
            Column::IngredientsJson => "ingredients_json",
            Column::TagsJson => "tags_json",
        }
    }

    pub fn value(self, row: &CocktailRow) -> Option<&str> {
        match self {
            Column::Name => Some(&row.name),
            Column::Category => row.category.as_deref(),
            Column::Alcoholic => row.alcoholic.as_deref(),
            Column::Glass => row.glass.as_deref(),
            Column::Instructions => row.instructions.as_deref(),
            Column::Iba => row.iba.as_deref(),
            Column::IngredientsJson => row.ingredients_json.as_deref(),
            Column::TagsJson => row.tags_json.as_deref(),
        }
    }
}

/// Filter over cocktail rows. Built by the catalog engines, evaluated by
/// whichever store is plugged in. A NULL column never matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    True,
    Equals(Column, String),
    /// Case-insensitive literal substring.
    Contains(Column, String),
    /// Neither NULL nor the empty string.
    NotEmpty(Column),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Conjunction that collapses trivial cases; no operands means `True`.
    pub fn all(predicates: Vec<Predicate>) -> Predicate {
        let mut predicates: Vec<Predicate> = predicates
            .into_iter()
            .filter(|p| *p != Predicate::True)
            .collect();

        match predicates.len() {
            0 => Predicate::True,
            1 => predicates.remove(0),
            _ => Predicate::And(predicates),
        }
    }

    pub fn any(mut predicates: Vec<Predicate>) -> Predicate {
        if predicates.len() == 1 {
            return predicates.remove(0);
        }
        Predicate::Or(predicates)
    }

    pub fn matches(&self, row: &CocktailRow) -> bool {
        match self {
            Predicate::True => true,
            Predicate::Equals(column, value) => column.value(row) == Some(value.as_str()),
            Predicate::Contains(column, needle) => column
                .value(row)
                .map(|v| v.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false),
            Predicate::NotEmpty(column) => column.value(row).is_some_and(|v| !v.is_empty()),
            Predicate::And(predicates) => predicates.iter().all(|p| p.matches(row)),
            Predicate::Or(predicates) => predicates.iter().any(|p| p.matches(row)),
        }
    }
}

/// A predicate plus the window of the id-ordered result to return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub predicate: Predicate,
    pub limit: Option<i64>,
    pub offset: i64,
}

impl Selection {
    pub fn all() -> Self {
        Self::filtered(Predicate::True)
    }

    pub fn filtered(predicate: Predicate) -> Self {
        Self {
            predicate,
            limit: None,
            offset: 0,
        }
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Cocktail, CocktailRow, Ingredient};

    fn row() -> CocktailRow {
        let mut cocktail = Cocktail::new("c1", "Gin Fizz");
        cocktail.category = Some("Ordinary Drink".to_owned());
        cocktail.iba = Some(String::new());
        cocktail.ingredients = vec![Ingredient::new("Gin", Some("2 oz"))];
        CocktailRow::try_from(&cocktail).unwrap()
    }

    #[test]
    fn contains_ignores_case() {
        assert!(Predicate::Contains(Column::Name, "gin f".to_owned()).matches(&row()));
        assert!(Predicate::Contains(Column::IngredientsJson, "GIN".to_owned()).matches(&row()));
    }

    #[test]
    fn null_columns_never_match() {
        assert!(!Predicate::Contains(Column::Glass, "".to_owned()).matches(&row()));
        assert!(!Predicate::Equals(Column::TagsJson, "".to_owned()).matches(&row()));
    }

    #[test]
    fn not_empty_rejects_blank_strings() {
        assert!(!Predicate::NotEmpty(Column::Iba).matches(&row()));
        assert!(Predicate::NotEmpty(Column::Category).matches(&row()));
    }

    #[test]
    fn all_collapses_trivial_conjunctions() {
        assert_eq!(Predicate::all(vec![]), Predicate::True);
        assert_eq!(
            Predicate::all(vec![Predicate::True, Predicate::NotEmpty(Column::Iba)]),
            Predicate::NotEmpty(Column::Iba)
        );
    }

    #[test]
    fn empty_disjunction_matches_nothing() {
        assert!(!Predicate::any(vec![]).matches(&row()));
    }
}
