use super::*;
use crate::dialect::{CommonDialect, Dialect, PostgresDialect};
use crate::{attrs, params};

#[test]
fn test_where_conditions_append_in_call_order() {
    let search = Search::new()
        .where_cond("age > ?", params![18])
        .where_cond("status = ?", params!["active"]);

    let conditions = search.where_conditions();
    assert_eq!(conditions.len(), 2);
    assert_eq!(conditions[0].expr(), "age > ?");
    assert_eq!(conditions[0].args().len(), 1);
    assert_eq!(conditions[1].expr(), "status = ?");
}

#[test]
fn test_condition_categories_are_independent() {
    let search = Search::new()
        .where_cond("a = ?", params![1])
        .or("b = ?", params![2])
        .not("c = ?", params![3])
        .joins("JOIN orders ON orders.user_id = users.id", params![])
        .having("count(*) > ?", params![5]);

    assert_eq!(search.where_conditions().len(), 1);
    assert_eq!(search.or_conditions().len(), 1);
    assert_eq!(search.not_conditions().len(), 1);
    assert_eq!(search.join_conditions().len(), 1);
    assert_eq!(search.having_conditions().len(), 1);
}

#[test]
fn test_having_conventions_store_uniformly() {
    let plain = Search::new().having("sum(total) > ?", params![100]);
    let wrapped = Search::new().having_expr(SqlExpr::new("sum(total) > ?", params![100]));

    let a = &plain.having_conditions()[0];
    let b = &wrapped.having_conditions()[0];
    assert_eq!(a.expr(), b.expr());
    assert_eq!(a.args().len(), b.args().len());
}

#[test]
fn test_select_replaces() {
    let search = Search::new()
        .select("id, name", params![])
        .select("count(*)", params![]);
    assert_eq!(search.selects().unwrap().expr(), "count(*)");
}

#[test]
fn test_omit_replaces() {
    let search = Search::new().omit(&["secret"]).omit(&["password", "token"]);
    assert_eq!(search.omits(), ["password", "token"]);
}

#[test]
fn test_limit_offset_last_write_wins() {
    let search = Search::new().limit(10).offset(5).limit(20).offset(40);
    assert_eq!(search.limit_value(), Some(20));
    assert_eq!(search.offset_value(), Some(40));
}

#[test]
fn test_order_appends_and_skips_empty() {
    let search = Search::new()
        .order("created_at desc")
        .order("")
        .order("id asc");
    assert_eq!(search.orders(), ["created_at desc", "id asc"]);
}

#[test]
fn test_reorder_discards_inherited_order() {
    let search = Search::new()
        .order("created_at desc")
        .order("id asc")
        .reorder("name");
    assert_eq!(search.orders(), ["name"]);
}

#[test]
fn test_group_accepts_text_and_integers() {
    assert_eq!(Search::new().group("region").group_expr(), "region");
    assert_eq!(Search::new().group(3i32).group_expr(), "3");
    assert_eq!(Search::new().group(7u64).group_expr(), "7");
}

#[test]
fn test_group_minus_one_sentinel_disables_grouping() {
    let search = Search::new().group("-1");
    assert_eq!(search.group_expr(), "");
    assert!(search.validate().is_ok());

    // the integer renders to the same literal and hits the same sentinel
    let search = Search::new().group(-1i64);
    assert_eq!(search.group_expr(), "");
    assert!(search.validate().is_ok());
}

#[test]
fn test_group_non_scalar_defers_error() {
    let search = Search::new().group(3.14).where_cond("a = ?", params![1]);

    // the chain keeps going; the clause stays neutral
    assert_eq!(search.group_expr(), "");
    assert_eq!(search.where_conditions().len(), 1);

    let err = search.validate().unwrap_err();
    assert!(err.is_invalid_sql(), "unexpected error: {err}");
    assert_eq!(search.build_errors().len(), 1);
}

#[test]
fn test_group_bool_defers_error() {
    let search = Search::new().group(true);
    assert!(search.validate().is_err());
}

#[test]
fn test_preload_replace_by_key_moves_to_end() {
    let search = Search::new()
        .preload("Orders", vec![SqlExpr::new("paid = ?", params![true])])
        .preload("Profile", vec![])
        .preload("Orders", vec![SqlExpr::new("total > ?", params![100])]);

    let preloads = search.preloads();
    assert_eq!(preloads.len(), 2);
    // the replaced entry moved to the end, behind "Profile"
    assert_eq!(preloads[0].name(), "Profile");
    assert_eq!(preloads[1].name(), "Orders");
    assert_eq!(preloads[1].conditions().len(), 1);
    assert_eq!(preloads[1].conditions()[0].expr(), "total > ?");
}

#[test]
fn test_attrs_and_assign_accumulate() {
    let search = Search::new()
        .attrs(attrs!["status" => "pending"])
        .attrs(attrs!["retries" => 0i32])
        .assign(attrs!["updated_by" => "worker"]);

    assert_eq!(search.init_attrs().len(), 2);
    assert_eq!(search.assign_attrs().len(), 1);
    assert!(search.init_attrs()[0].get("status").is_some());
}

#[test]
fn test_attr_map_replaces_same_column() {
    let mut map = AttrMap::new();
    map.set("status", Param::new("pending"));
    map.set("status", Param::new("done"));
    assert_eq!(map.len(), 1);
}

#[test]
fn test_table_records_schema_qualifier() {
    let search = Search::new().table("checkout.shopping_cart");
    assert_eq!(search.table_name(), "checkout.shopping_cart");
    assert_eq!(search.schema_name(), "checkout");

    let search = Search::new().table("shopping_cart");
    assert_eq!(search.schema_name(), "");
}

#[test]
fn test_flags() {
    let search = Search::new().raw(true).unscoped().ignore_order(true);
    assert!(search.is_raw());
    assert!(search.is_unscoped());
    assert!(search.ignores_order());
}

#[test]
fn test_clone_branches_independently() {
    let base = Search::new()
        .table("users")
        .where_cond("age > ?", params![18])
        .limit(10);

    let branch = base.clone().where_cond("vip = ?", params![true]);
    let other = base.clone().or("banned = ?", params![false]);

    assert_eq!(base.where_conditions().len(), 1);
    assert_eq!(branch.where_conditions().len(), 2);
    assert_eq!(other.where_conditions().len(), 1);
    assert_eq!(other.or_conditions().len(), 1);
    assert_eq!(base.or_conditions().len(), 0);

    // scalar fields read identically right after the clone
    assert_eq!(branch.limit_value(), base.limit_value());
    assert_eq!(branch.table_name(), base.table_name());
}

#[test]
fn test_clone_keeps_deferred_errors_with_the_value() {
    let broken = Search::new().group(2.5);
    let branch = broken.clone();
    assert!(branch.validate().is_err());
    assert!(broken.validate().is_err());
}

// ==================== Render contract ====================
//
// A minimal stand-in for the external engine: joins the where/or chains and
// substitutes every `?` with the dialect's placeholder for the next 1-based
// position. Only exercises the accumulation contract, not real clause
// assembly.

fn substitute(expr: &str, dialect: &dyn Dialect, position: &mut usize) -> String {
    let mut out = String::new();
    for ch in expr.chars() {
        if ch == '?' {
            *position += 1;
            out.push_str(&dialect.bind_var(*position));
        } else {
            out.push(ch);
        }
    }
    out
}

fn render(search: &Search, dialect: &dyn Dialect) -> (String, Vec<Param>) {
    let mut position = 0;
    let mut sql = String::new();
    let mut params: Vec<Param> = Vec::new();

    for (i, cond) in search.where_conditions().iter().enumerate() {
        if i > 0 {
            sql.push_str(" AND ");
        }
        sql.push_str(&substitute(cond.expr(), dialect, &mut position));
        params.extend(cond.args().iter().cloned());
    }
    for cond in search.or_conditions() {
        sql.push_str(" OR ");
        sql.push_str(&substitute(cond.expr(), dialect, &mut position));
        params.extend(cond.args().iter().cloned());
    }
    if !search.orders().is_empty() && !search.ignores_order() {
        sql.push_str(" ORDER BY ");
        sql.push_str(&search.orders().join(", "));
    }
    if let Some(limit) = search.limit_value() {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    (sql, params)
}

#[test]
fn test_render_against_postgres_binds_in_call_order() {
    let search = Search::new()
        .where_cond("age > ?", params![18])
        .or("vip = ?", params![true])
        .order("created_at desc")
        .limit(10);

    let (sql, params) = render(&search, &PostgresDialect::new());
    assert_eq!(sql, "age > $1 OR vip = $2 ORDER BY created_at desc LIMIT 10");

    // two arguments, handed to the driver in call order
    let refs: Vec<&(dyn tokio_postgres::types::ToSql + Sync)> =
        params.iter().map(|p| p.as_sql()).collect();
    assert_eq!(refs.len(), 2);
}

#[test]
fn test_render_against_common_uses_anonymous_placeholders() {
    let search = Search::new()
        .where_cond("age > ?", params![18])
        .or("vip = ?", params![true]);

    let (sql, _) = render(&search, &CommonDialect::new());
    assert_eq!(sql, "age > ? OR vip = ?");
}

#[test]
fn test_same_search_renders_against_both_dialects() {
    let search = Search::new().where_cond("id = ?", params![7]);
    let (pg, _) = render(&search, &PostgresDialect::new());
    let (common, _) = render(&search, &CommonDialect::new());
    assert_eq!(pg, "id = $1");
    assert_eq!(common, "id = ?");
}
