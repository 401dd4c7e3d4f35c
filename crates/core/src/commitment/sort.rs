//! Sort allow-list for commitment listings.
//!
//! Request parameters are resolved into closed enums here; the database layer
//! maps each variant to a column, so no request string ever reaches a query.

/// Fields a commitment listing may be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    /// Due date.
    DueDate,
    /// Creation timestamp.
    #[default]
    CreatedAt,
    /// Commitment amount.
    Amount,
    /// Description text.
    Description,
    /// Status value.
    Status,
}

impl SortField {
    /// Resolves a `sortBy` request value. Unknown values return `None`.
    #[must_use]
    pub fn from_param(value: &str) -> Option<Self> {
        match value.trim() {
            "due_date" => Some(Self::DueDate),
            "created_at" => Some(Self::CreatedAt),
            "amount" => Some(Self::Amount),
            "description" => Some(Self::Description),
            "status" => Some(Self::Status),
            _ => None,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    #[default]
    Desc,
}

impl SortOrder {
    /// Resolves an `order` request value (`ASC`/`DESC`, any case).
    #[must_use]
    pub fn from_param(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ASC" => Some(Self::Asc),
            "DESC" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Resolved sort for a commitment listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitmentSort {
    /// Column to sort by.
    pub field: SortField,
    /// Direction.
    pub order: SortOrder,
}

impl CommitmentSort {
    /// Builds a sort from raw `sortBy` and `order` parameters.
    ///
    /// A missing or unrecognised `sortBy` silently falls back to
    /// `created_at DESC`, whatever `order` says. A recognised field with a
    /// missing or unrecognised `order` sorts descending.
    #[must_use]
    pub fn from_params(sort_by: Option<&str>, order: Option<&str>) -> Self {
        match sort_by.and_then(SortField::from_param) {
            Some(field) => Self {
                field,
                order: order.and_then(SortOrder::from_param).unwrap_or_default(),
            },
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("due_date"), Some("ASC"), SortField::DueDate, SortOrder::Asc)]
    #[case(Some("amount"), Some("desc"), SortField::Amount, SortOrder::Desc)]
    #[case(Some("description"), Some("asc"), SortField::Description, SortOrder::Asc)]
    #[case(Some("status"), None, SortField::Status, SortOrder::Desc)]
    #[case(Some("created_at"), Some("sideways"), SortField::CreatedAt, SortOrder::Desc)]
    fn test_recognised_fields(
        #[case] sort_by: Option<&str>,
        #[case] order: Option<&str>,
        #[case] field: SortField,
        #[case] direction: SortOrder,
    ) {
        let sort = CommitmentSort::from_params(sort_by, order);
        assert_eq!(sort.field, field);
        assert_eq!(sort.order, direction);
    }

    #[rstest]
    #[case(Some("id; DROP TABLE commitments"), Some("ASC"))]
    #[case(Some("commit_number"), Some("ASC"))]
    #[case(Some("DUE_DATE"), Some("ASC"))]
    #[case(None, Some("ASC"))]
    #[case(None, None)]
    fn test_unknown_field_falls_back_to_created_at_desc(
        #[case] sort_by: Option<&str>,
        #[case] order: Option<&str>,
    ) {
        let sort = CommitmentSort::from_params(sort_by, order);
        assert_eq!(
            sort,
            CommitmentSort {
                field: SortField::CreatedAt,
                order: SortOrder::Desc,
            }
        );
    }
}
