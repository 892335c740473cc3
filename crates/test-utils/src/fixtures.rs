// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Test fixtures and sample SOQL queries

/// Sample SOQL queries for testing
pub struct SoqlFixtures;

impl SoqlFixtures {
    // ===== Basic SELECT queries =====

    /// Simple SELECT with field list
    pub const fn simple_select() -> &'static str {
        "SELECT Id, Name, Industry FROM Account"
    }

    /// Relationship fields
    pub const fn relationship_fields() -> &'static str {
        "SELECT Id, Account.Name, Account.Owner.Email FROM Contact"
    }

    /// Aliased object
    pub const fn object_alias() -> &'static str {
        "SELECT a.Id, a.Name FROM Account a"
    }

    /// SELECT with WHERE clause
    pub const fn select_with_where() -> &'static str {
        "SELECT Id, Name FROM Account WHERE Industry = 'Technology' AND AnnualRevenue > 1000000"
    }

    /// Nested parentheses and NOT
    pub const fn nested_conditions() -> &'static str {
        "SELECT Id FROM Account WHERE (Name LIKE 'A%' OR NOT Industry IN ('Retail', 'Energy')) AND IsDeleted = false"
    }

    /// Date literals
    pub const fn date_literals() -> &'static str {
        "SELECT Id FROM Opportunity WHERE CloseDate = THIS_QUARTER OR CreatedDate > LAST_N_DAYS:30"
    }

    /// SELECT with ORDER BY
    pub const fn select_with_order() -> &'static str {
        "SELECT Id, Name FROM Account ORDER BY Name ASC NULLS FIRST, CreatedDate DESC"
    }

    /// SELECT with LIMIT and OFFSET
    pub const fn select_with_limit_offset() -> &'static str {
        "SELECT Id FROM Account LIMIT 10 OFFSET 20"
    }

    // ===== Aggregation queries =====

    /// Simple COUNT
    pub const fn count_aggregation() -> &'static str {
        "SELECT COUNT() FROM Account"
    }

    /// GROUP BY with HAVING
    pub const fn group_by_having() -> &'static str {
        "SELECT Industry, COUNT(Id) total FROM Account GROUP BY Industry HAVING COUNT(Id) > 5"
    }

    /// Date function grouping
    pub const fn date_function_grouping() -> &'static str {
        "SELECT CALENDAR_YEAR(CloseDate), SUM(Amount) FROM Opportunity GROUP BY CALENDAR_YEAR(CloseDate)"
    }

    // ===== Subqueries =====

    /// Child-relationship subquery
    pub const fn child_subquery() -> &'static str {
        "SELECT Id, Name, (SELECT Id, LastName FROM Contacts) FROM Account"
    }

    /// Subquery nested in a subquery
    pub const fn nested_subquery() -> &'static str {
        "SELECT Id, (SELECT Id, (SELECT Subject FROM Cases) FROM Contacts) FROM Account"
    }

    /// Semi-join in WHERE
    pub const fn semi_join() -> &'static str {
        "SELECT Id FROM Account WHERE Id IN (SELECT AccountId FROM Opportunity WHERE IsWon = true)"
    }

    // ===== Other clauses =====

    /// TYPEOF projection
    pub const fn typeof_projection() -> &'static str {
        "SELECT TYPEOF What WHEN Account THEN Phone WHEN Opportunity THEN Amount ELSE Name END FROM Event"
    }

    /// Security and modes
    pub const fn with_security_enforced() -> &'static str {
        "SELECT Id FROM Account WITH SECURITY_ENFORCED"
    }

    /// Row locking
    pub const fn for_update() -> &'static str {
        "SELECT Id FROM Account LIMIT 1 FOR UPDATE"
    }

    /// Apex bind variable
    pub const fn bind_variable() -> &'static str {
        "SELECT Id FROM Contact WHERE AccountId = :accountId"
    }

    /// `Order` is an object unless `BY` follows
    pub const fn order_object() -> &'static str {
        "SELECT Id, OrderNumber FROM Order ORDER BY EffectiveDate"
    }

    pub const fn group_object() -> &'static str {
        "SELECT Id, Name FROM Group WHERE Type = 'Queue'"
    }

    // ===== Error cases =====

    /// Missing FROM
    pub const fn error_missing_from() -> &'static str {
        "SELECT Id, Name"
    }

    /// Trailing comma in the field list
    pub const fn error_trailing_comma() -> &'static str {
        "SELECT Id, FROM Account"
    }

    /// Clauses out of order
    pub const fn error_clause_order() -> &'static str {
        "SELECT Id FROM Account LIMIT 5 WHERE Name = 'x'"
    }

    /// Incomplete condition
    pub const fn error_incomplete_where() -> &'static str {
        "SELECT Id FROM Account WHERE Name ="
    }

    /// Every valid fixture
    pub fn valid() -> Vec<&'static str> {
        vec![
            Self::simple_select(),
            Self::relationship_fields(),
            Self::object_alias(),
            Self::select_with_where(),
            Self::nested_conditions(),
            Self::date_literals(),
            Self::select_with_order(),
            Self::select_with_limit_offset(),
            Self::count_aggregation(),
            Self::group_by_having(),
            Self::date_function_grouping(),
            Self::child_subquery(),
            Self::nested_subquery(),
            Self::semi_join(),
            Self::typeof_projection(),
            Self::with_security_enforced(),
            Self::for_update(),
            Self::bind_variable(),
            Self::order_object(),
            Self::group_object(),
        ]
    }

    /// Every invalid fixture
    pub fn invalid() -> Vec<&'static str> {
        vec![
            "",
            Self::error_missing_from(),
            Self::error_trailing_comma(),
            Self::error_clause_order(),
            Self::error_incomplete_where(),
        ]
    }
}
