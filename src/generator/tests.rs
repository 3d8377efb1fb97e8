use std::collections::HashMap;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use super::*;
use crate::dialect::{DialectKind, MySqlDialect, OracleDialect, PostgresDialect, SqlServerDialect};
use crate::error::SqlGenError;
use crate::mapping::KeyType;
use crate::predicate::{Operator, field, is_in};
use crate::value::SqlValue;

fn person() -> TableMap {
    TableMap::new("Person")
        .column(ColumnMap::new("Id").key(KeyType::Identity))
        .column(ColumnMap::new("Name"))
        .column(ColumnMap::new("Age"))
}

fn customer() -> TableMap {
    TableMap::new("Customer")
        .schema("sales")
        .column(ColumnMap::new("Code").key(KeyType::Assigned))
        .column(ColumnMap::new("FullName").column("full_name"))
        .column(ColumnMap::new("Created").read_only())
        .column(ColumnMap::new("Cache").ignore())
}

fn pg() -> SqlGenerator {
    SqlGenerator::new(PostgresDialect)
}

fn mssql() -> SqlGenerator {
    SqlGenerator::new(SqlServerDialect)
}

// --- names ---

#[test]
fn test_table_name_with_schema() {
    assert_eq!(mssql().table_name(&customer()).unwrap(), "[sales].[Customer]");
}

#[test]
fn test_column_alias_only_when_renamed() {
    let map = customer();
    let g = pg();
    assert_eq!(
        g.column_name_of(&map, "fullname", true).unwrap(),
        "\"full_name\" AS \"FullName\""
    );
    assert_eq!(g.column_name_of(&map, "FullName", false).unwrap(), "\"full_name\"");
    assert_eq!(g.column_name_of(&map, "Code", true).unwrap(), "\"Code\"");
}

#[test]
fn test_lookup_matches_direct_descriptor() {
    let map = customer();
    let g = pg();
    for column in &map.columns {
        let by_name = g.column_name_of(&map, &column.name.to_uppercase(), false).unwrap();
        assert_eq!(by_name, g.column_name(&map, column, false).unwrap());
    }
}

#[test]
fn test_unknown_column_lookup_fails() {
    let err = pg().column_name_of(&person(), "Email", false).unwrap_err();
    assert!(matches!(err, SqlGenError::UnknownColumn { ref property, .. } if property == "Email"));
}

#[test]
fn test_qualified_columns() {
    let g = mssql().with_options(GeneratorOptions { qualify_columns: true });
    let mut params = Parameters::new();
    let sql = g.build_select(&customer(), None, &[], &mut params).unwrap();
    assert_eq!(
        sql,
        "SELECT [sales].[Customer].[Code], [sales].[Customer].[full_name] AS [FullName], [sales].[Customer].[Created] FROM [sales].[Customer]"
    );
}

// --- select ---

#[test]
fn test_select_without_predicate_or_sort() {
    let mut params = Parameters::new();
    let sql = pg().build_select(&customer(), None, &[], &mut params).unwrap();
    assert_eq!(
        sql,
        "SELECT \"Code\", \"full_name\" AS \"FullName\", \"Created\" FROM \"sales\".\"Customer\""
    );
    assert!(params.is_empty());
}

#[test]
fn test_select_with_predicate_and_sort() {
    let mut params = Parameters::new();
    let p = field("Age", Operator::Gt, 21);
    let sql = pg()
        .build_select(&person(), Some(&p), &[Sort::desc("Age"), Sort::asc("name")], &mut params)
        .unwrap();
    assert_eq!(
        sql,
        "SELECT \"Id\", \"Name\", \"Age\" FROM \"Person\" WHERE \"Age\" > @Age_p0 ORDER BY \"Age\" DESC, \"Name\" ASC"
    );
    assert_eq!(params.get("@Age_p0"), Some(&SqlValue::Int(21)));
}

#[test]
fn test_select_unknown_sort_fails() {
    let mut params = Parameters::new();
    let err = pg()
        .build_select(&person(), None, &[Sort::asc("Missing")], &mut params)
        .unwrap_err();
    assert!(matches!(err, SqlGenError::UnknownColumn { .. }));
}

#[test]
fn test_count() {
    let mut params = Parameters::new();
    let p = is_in("Id", [1, 2]);
    let sql = mssql().build_count(&person(), Some(&p), &mut params).unwrap();
    assert_eq!(
        sql,
        "SELECT COUNT(*) AS [Total] FROM [Person] WHERE [Id] IN (@Id_p0, @Id_p1)"
    );
    assert_eq!(
        mssql().build_count(&person(), None, &mut Parameters::new()).unwrap(),
        "SELECT COUNT(*) AS [Total] FROM [Person]"
    );
}

#[test]
fn test_paged_select_sqlserver() {
    let mut params = Parameters::new();
    let p = field("Name", Operator::Like, "A%");
    let sql = mssql()
        .build_paged(&person(), Some(&p), &[Sort::asc("Id")], 3, 10, &mut params)
        .unwrap();
    assert_eq!(
        sql,
        "SELECT [Id], [Name], [Age] FROM [Person] WHERE [Name] LIKE @Name_p0 ORDER BY [Id] ASC OFFSET @_offset ROWS FETCH NEXT @_limit ROWS ONLY"
    );
    assert_eq!(params.get("@_offset"), Some(&SqlValue::Int(30)));
    assert_eq!(params.get("@_limit"), Some(&SqlValue::Int(10)));
    assert_eq!(params.len(), 3);
}

#[test]
fn test_windowed_select_mysql() {
    let mut params = Parameters::new();
    let sql = SqlGenerator::new(MySqlDialect)
        .build_windowed(&person(), None, &[Sort::desc("Age")], 5, 15, &mut params)
        .unwrap();
    assert_eq!(
        sql,
        "SELECT `Id`, `Name`, `Age` FROM `Person` ORDER BY `Age` DESC LIMIT @_offset, @_limit"
    );
    assert_eq!(params.get("@_offset"), Some(&SqlValue::Int(5)));
}

#[test]
fn test_paging_requires_sort() {
    let mut params = Parameters::new();
    let g = pg();
    assert!(matches!(
        g.build_paged(&person(), None, &[], 0, 10, &mut params),
        Err(SqlGenError::MissingSort)
    ));
    assert!(matches!(
        g.build_windowed(&person(), None, &[], 0, 10, &mut params),
        Err(SqlGenError::MissingSort)
    ));
    assert!(params.is_empty());
}

#[test]
fn test_window_beyond_i64_is_out_of_range() {
    let mut params = Parameters::new();
    let err = pg()
        .build_windowed(&person(), None, &[Sort::asc("Id")], u64::MAX, 5, &mut params)
        .unwrap_err();
    assert!(matches!(err, SqlGenError::OutOfRange { ref parameter } if parameter == "@_offset"));

    let mut params = Parameters::new();
    let err = SqlGenerator::for_kind(DialectKind::Oracle)
        .build_windowed(&person(), None, &[Sort::asc("Id")], u64::MAX, 1, &mut params)
        .unwrap_err();
    assert!(matches!(err, SqlGenError::OutOfRange { .. }));
}

#[test]
fn test_sort_on_ambiguous_property_fails() {
    let map = TableMap::new("Person")
        .column(ColumnMap::new("Name").column("a"))
        .column(ColumnMap::new("name").column("b"));
    let mut params = Parameters::new();
    assert!(matches!(
        pg().build_select(&map, None, &[Sort::asc("NAME")], &mut params),
        Err(SqlGenError::AmbiguousColumn { .. })
    ));
}

// --- insert ---

#[test]
fn test_insert_skips_identity() {
    assert_eq!(
        pg().build_insert(&person()).unwrap(),
        "INSERT INTO \"Person\" (\"Name\", \"Age\") VALUES (@Name, @Age)"
    );
}

#[test]
fn test_insert_skips_read_only_and_ignored() {
    assert_eq!(
        mssql().build_insert(&customer()).unwrap(),
        "INSERT INTO [sales].[Customer] ([Code], [full_name]) VALUES (@Code, @FullName)"
    );
}

#[test]
fn test_insert_column_and_param_lists_align() {
    let sql = mssql().build_insert(&customer()).unwrap();
    let (cols, vals) = sql.split_once(" VALUES ").unwrap();
    let cols = cols.split_once('(').unwrap().1.trim_end_matches(')');
    let vals = vals.trim_start_matches('(').trim_end_matches(')');
    assert_eq!(cols.split(", ").count(), vals.split(", ").count());
}

#[test]
fn test_insert_trigger_identity() {
    let map = TableMap::new("EMP")
        .column(ColumnMap::new("EmpId").column("EMP_ID").key(KeyType::TriggerIdentity))
        .column(ColumnMap::new("Name"));
    assert_eq!(
        SqlGenerator::new(OracleDialect).build_insert(&map).unwrap(),
        "INSERT INTO \"EMP\" (\"Name\") VALUES (:Name) RETURNING \"EMP_ID\" INTO :IdOutParam"
    );
}

#[test]
fn test_insert_multiple_trigger_identities_fail() {
    let map = TableMap::new("EMP")
        .column(ColumnMap::new("A").key(KeyType::TriggerIdentity))
        .column(ColumnMap::new("B").key(KeyType::TriggerIdentity))
        .column(ColumnMap::new("Name"));
    let err = pg().build_insert(&map).unwrap_err();
    assert!(matches!(
        err,
        SqlGenError::MultiColumnTriggerIdentityUnsupported { count: 2, .. }
    ));
}

#[test]
fn test_insert_without_writable_columns_fails() {
    let map = TableMap::new("Log")
        .column(ColumnMap::new("Id").key(KeyType::Identity))
        .column(ColumnMap::new("At").read_only());
    assert!(matches!(
        pg().build_insert(&map),
        Err(SqlGenError::NoMappedColumns { .. })
    ));
}

// --- bulk insert ---

#[test]
fn test_bulk_insert_collapses_same_table() {
    let a = person();
    let b = person();
    let sql = mssql().build_bulk_insert(&[&a, &b]).unwrap();
    assert_eq!(
        sql,
        "INSERT INTO [Person] ([Name], [Age]) VALUES\n(@Name0, @Age0),\n(@Name1, @Age1);"
    );
}

#[test]
fn test_bulk_insert_groups_rows_by_table() {
    let p = person();
    let c = customer();
    let sql = mssql().build_bulk_insert(&[&p, &c, &p]).unwrap();
    assert_eq!(
        sql,
        "INSERT INTO [Person] ([Name], [Age]) VALUES\n(@Name0, @Age0),\n(@Name1, @Age1);\n\
         INSERT INTO [sales].[Customer] ([Code], [full_name]) VALUES\n(@Code0, @FullName0);"
    );
}

#[test]
fn test_bulk_insert_same_table_different_schema() {
    let a = person();
    let b = person().schema("archive");
    let sql = pg().build_bulk_insert(&[&a, &b]).unwrap();
    assert_eq!(sql.matches("INSERT INTO").count(), 2);
    assert!(sql.contains("\"archive\".\"Person\""));
}

#[test]
fn test_bulk_insert_rejects_placeholders_that_render_alike() {
    let map = TableMap::new("T")
        .column(ColumnMap::new("A"))
        .column(ColumnMap::new("A1"));
    let rows: Vec<&TableMap> = std::iter::repeat(&map).take(11).collect();
    let err = mssql().build_bulk_insert(&rows).unwrap_err();
    assert!(matches!(err, SqlGenError::DuplicateParameter(ref name) if name == "@A10"));

    // Ten rows stop at @A9 / @A19, which stay distinct.
    assert!(mssql().build_bulk_insert(&rows[..10]).is_ok());
}

#[test]
fn test_bulk_insert_empty_fails() {
    assert!(matches!(pg().build_bulk_insert(&[]), Err(SqlGenError::EmptyBatch)));
}

#[test]
fn test_bulk_insert_values_renders_literals() {
    let map = TableMap::new("Event")
        .column(ColumnMap::new("Id").key(KeyType::Identity))
        .column(ColumnMap::new("Title"))
        .column(ColumnMap::new("Day"))
        .column(ColumnMap::new("Active"))
        .column(ColumnMap::new("Score"));
    let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let rows = vec![
        HashMap::from([
            ("Id".to_string(), SqlValue::from(99)),
            ("Title".to_string(), SqlValue::from("Launch's day")),
            ("Day".to_string(), SqlValue::from(day)),
            ("Active".to_string(), SqlValue::from(true)),
            ("Score".to_string(), SqlValue::from(4.5)),
        ]),
        HashMap::from([("Title".to_string(), SqlValue::from("Retro"))]),
    ];
    let sql = mssql().build_bulk_insert_values(&map, &rows).unwrap();
    assert_eq!(
        sql,
        "INSERT INTO [Event] ([Title], [Day], [Active], [Score]) VALUES\n\
         ('Launch''s day', '2024-05-01', 1, 4.5),\n\
         ('Retro', NULL, NULL, NULL);"
    );
}

#[test]
fn test_bulk_insert_values_empty_fails() {
    let rows: Vec<HashMap<String, SqlValue>> = Vec::new();
    assert!(matches!(
        pg().build_bulk_insert_values(&person(), &rows),
        Err(SqlGenError::EmptyBatch)
    ));
}

// --- update ---

#[test]
fn test_update_example() {
    let mut params = Parameters::new();
    let p = field("Id", Operator::Eq, 7);
    let sql = pg().build_update(&person(), Some(&p), &mut params, false).unwrap();
    assert_eq!(
        sql,
        "UPDATE \"Person\" SET \"Name\" = @Name, \"Age\" = @Age WHERE \"Id\" = @Id_p0"
    );
}

#[test]
fn test_update_key_handling() {
    let map = TableMap::new("Item")
        .column(ColumnMap::new("Id").key(KeyType::Identity))
        .column(ColumnMap::new("Sku").key(KeyType::Assigned))
        .column(ColumnMap::new("Seq").key(KeyType::TriggerIdentity))
        .column(ColumnMap::new("Qty"));
    let p = field("Sku", Operator::Eq, "X1");
    let g = mssql();

    let mut params = Parameters::new();
    assert_eq!(
        g.build_update(&map, Some(&p), &mut params, false).unwrap(),
        "UPDATE [Item] SET [Seq] = @Seq, [Qty] = @Qty WHERE [Sku] = @Sku_p0"
    );
    let mut params = Parameters::new();
    assert_eq!(
        g.build_update(&map, Some(&p), &mut params, true).unwrap(),
        "UPDATE [Item] SET [Qty] = @Qty WHERE [Sku] = @Sku_p0"
    );
}

#[test]
fn test_update_requires_predicate() {
    let mut params = Parameters::new();
    assert!(matches!(
        pg().build_update(&person(), None, &mut params, false),
        Err(SqlGenError::MissingPredicate)
    ));
}

#[test]
fn test_update_without_columns_fails() {
    let map = TableMap::new("Link")
        .column(ColumnMap::new("A").key(KeyType::Assigned))
        .column(ColumnMap::new("B").key(KeyType::Assigned));
    let p = field("A", Operator::Eq, 1);
    let mut params = Parameters::new();
    assert!(matches!(
        pg().build_update(&map, Some(&p), &mut params, false),
        Err(SqlGenError::NoMappedColumns { .. })
    ));
}

// --- bulk update ---

#[test]
fn test_bulk_update_suffixes_per_statement() {
    let predicates = vec![field("Id", Operator::Eq, 1), field("Id", Operator::Eq, 2)];
    let mut params = Parameters::new();
    let sql = mssql()
        .build_bulk_update(&person(), &predicates, &mut params, false)
        .unwrap();
    assert_eq!(
        sql,
        "UPDATE [Person] SET [Name] = @Name_0, [Age] = @Age_0 WHERE [Id] = @Id_p0;\n\
         UPDATE [Person] SET [Name] = @Name_1, [Age] = @Age_1 WHERE [Id] = @Id_p1;"
    );
    assert_eq!(sql.lines().count(), predicates.len());
}

#[test]
fn test_bulk_update_set_and_predicate_names_never_collide() {
    // Predicates on a column that is also SET.
    let predicates = vec![
        field("Name", Operator::Eq, "a").boxed(),
        field("Name", Operator::Eq, "b").boxed(),
    ];
    let mut params = Parameters::new();
    let sql = pg()
        .build_bulk_update(&person(), &predicates, &mut params, false)
        .unwrap();
    assert!(sql.contains("\"Name\" = @Name_0"));
    assert!(sql.contains("\"Name\" = @Name_p0"));
    for (name, _) in params.iter() {
        assert!(!sql.contains(&format!("= {}, ", name)), "{} reused in SET", name);
    }
    assert_eq!(params.len(), 2);
}

#[test]
fn test_update_predicate_name_matching_set_placeholder_fails() {
    let map = TableMap::new("Person")
        .column(ColumnMap::new("Id").key(KeyType::Identity))
        .column(ColumnMap::new("Id_p0"));
    let mut params = Parameters::new();
    let by_id = field("Id", Operator::Eq, 1);
    let err = pg()
        .build_update(&map, Some(&by_id), &mut params, false)
        .unwrap_err();
    assert!(matches!(err, SqlGenError::DuplicateParameter(ref name) if name == "@Id_p0"));
}

#[test]
fn test_update_allows_caller_bound_set_values() {
    let mut params = Parameters::new();
    params.insert("@Name", "Ann").unwrap();
    params.insert("@Age", 30).unwrap();
    let by_id = field("Id", Operator::Eq, 1);
    let sql = pg()
        .build_update(&person(), Some(&by_id), &mut params, false)
        .unwrap();
    assert!(sql.ends_with("WHERE \"Id\" = @Id_p2"));
}

#[test]
fn test_bulk_update_requires_predicates() {
    let predicates: Vec<Box<dyn Predicate>> = Vec::new();
    let mut params = Parameters::new();
    assert!(matches!(
        pg().build_bulk_update(&person(), &predicates, &mut params, false),
        Err(SqlGenError::EmptyPredicateList)
    ));
}

// --- delete / identity ---

#[test]
fn test_delete() {
    let mut params = Parameters::new();
    let p = field("Age", Operator::Lt, 18);
    assert_eq!(
        mssql().build_delete(&person(), Some(&p), &mut params).unwrap(),
        "DELETE FROM [Person] WHERE [Age] < @Age_p0"
    );
}

#[test]
fn test_delete_requires_predicate() {
    let mut params = Parameters::new();
    assert!(matches!(
        mssql().build_delete(&person(), None, &mut params),
        Err(SqlGenError::MissingPredicate)
    ));
}

#[test]
fn test_identity_sql() {
    assert_eq!(
        mssql().build_identity_sql(&person()).unwrap(),
        "SELECT CAST(SCOPE_IDENTITY() AS BIGINT) AS [Id]"
    );
    assert!(matches!(
        SqlGenerator::new(OracleDialect).build_identity_sql(&person()),
        Err(SqlGenError::Unsupported { .. })
    ));
}

#[test]
fn test_supports_multiple_statements_delegates() {
    assert!(mssql().supports_multiple_statements());
    assert!(!SqlGenerator::for_kind(DialectKind::Oracle).supports_multiple_statements());
}
