//! End-to-end tests: SQL text in, schema model out.

use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use serde_json::json;

use erschema::{
    Column, ColumnRef, Dialect, ParseOptions, Schema, SqlParseError, parse_sql, parse_sql_with,
};

// =============================================================================
// Helpers
// =============================================================================

fn relationship_ids(schema: &Schema) -> BTreeSet<String> {
    schema.relationships.iter().map(|r| r.id.clone()).collect()
}

fn column<'a>(schema: &'a Schema, table: &str, name: &str) -> &'a Column {
    schema
        .table(table)
        .and_then(|t| t.column(name))
        .unwrap_or_else(|| panic!("missing column {table}.{name}"))
}

/// Regenerate DDL from a schema: tables first, foreign keys as ALTER TABLE.
fn to_ddl(schema: &Schema) -> String {
    let mut out = String::new();
    for table in &schema.tables {
        let mut defs: Vec<String> = table
            .columns
            .iter()
            .map(|c| {
                let mut def = format!("{} {}", c.name, c.typ);
                if c.is_not_null {
                    def.push_str(" NOT NULL");
                }
                if c.is_unique {
                    def.push_str(" UNIQUE");
                }
                def
            })
            .collect();
        let pks: Vec<&str> = table
            .columns
            .iter()
            .filter(|c| c.is_primary_key)
            .map(|c| c.name.as_str())
            .collect();
        if !pks.is_empty() {
            defs.push(format!("PRIMARY KEY ({})", pks.join(", ")));
        }
        out.push_str(&format!("CREATE TABLE {} ({});\n", table.name, defs.join(", ")));
    }
    for rel in &schema.relationships {
        out.push_str(&format!(
            "ALTER TABLE {} ADD FOREIGN KEY ({}) REFERENCES {}({});\n",
            rel.source_table, rel.source_column, rel.target_table, rel.target_column
        ));
    }
    out
}

const SHOP_MYSQL: &str = r#"
-- shop schema
DROP TABLE IF EXISTS `order_items`;
CREATE TABLE `users` (
  `id` INT NOT NULL AUTO_INCREMENT,
  `email` VARCHAR(255) NOT NULL UNIQUE,
  `status` VARCHAR(20) DEFAULT 'active',
  PRIMARY KEY (`id`)
) ENGINE=InnoDB;

CREATE TABLE `orders` (
  `id` INT NOT NULL AUTO_INCREMENT PRIMARY KEY,
  `user_id` INT NOT NULL,
  `total` DECIMAL(10,2),
  KEY `idx_user` (`user_id`),
  CONSTRAINT `fk_orders_user` FOREIGN KEY (`user_id`) REFERENCES `users` (`id`) ON DELETE CASCADE
) ENGINE=InnoDB;

CREATE TABLE `products` (
  `id` INT PRIMARY KEY,
  `name` VARCHAR(100)
);

CREATE TABLE `order_items` (
  `order_id` INT NOT NULL,
  `product_id` INT NOT NULL,
  `quantity` INT,
  PRIMARY KEY (`order_id`, `product_id`)
);

ALTER TABLE `order_items`
  ADD CONSTRAINT `fk_items_order` FOREIGN KEY (`order_id`) REFERENCES `orders` (`id`),
  ADD CONSTRAINT `fk_items_product` FOREIGN KEY (`product_id`) REFERENCES `products` (`id`);

CREATE INDEX `idx_name` ON `products` (`name`);
INSERT INTO `products` (`id`, `name`) VALUES (1, 'widget');
"#;

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn scenario_a_single_table() {
    let schema = parse_sql("CREATE TABLE users (id INT PRIMARY KEY, email VARCHAR(255));").unwrap();

    assert_eq!(schema.tables.len(), 1);
    let users = &schema.tables[0];
    assert_eq!(users.id, "users");
    assert_eq!(users.name, "users");

    let id = &users.columns[0];
    assert_eq!(id.name, "id");
    assert!(id.is_primary_key);
    assert!(id.is_not_null);

    let email = &users.columns[1];
    assert_eq!(email.name, "email");
    assert_eq!(email.typ, "VARCHAR(255)");
    assert!(!email.is_primary_key);
    assert!(!email.is_not_null);

    assert!(schema.relationships.is_empty());
}

#[test]
fn scenario_b_table_level_foreign_key() {
    let schema = parse_sql(
        "CREATE TABLE users (id INT PRIMARY KEY);
         CREATE TABLE orders (id INT PRIMARY KEY, user_id INT, FOREIGN KEY (user_id) REFERENCES users(id));",
    )
    .unwrap();

    assert_eq!(schema.tables.len(), 2);
    assert_eq!(
        relationship_ids(&schema),
        BTreeSet::from(["orders.user_id->users.id".to_string()])
    );

    let user_id = column(&schema, "orders", "user_id");
    assert!(user_id.is_foreign_key);
    assert_eq!(user_id.references, Some(ColumnRef::new("users", "id")));
}

#[test]
fn scenario_c_naming_heuristic() {
    let schema = parse_sql(
        "CREATE TABLE users (id INT PRIMARY KEY);
         CREATE TABLE orders (id INT PRIMARY KEY, user_id INT);",
    )
    .unwrap();

    assert_eq!(
        relationship_ids(&schema),
        BTreeSet::from(["orders.user_id->users.id".to_string()])
    );
    assert!(column(&schema, "orders", "user_id").is_foreign_key);
}

#[test]
fn scenario_d_alter_table_unknown_target() {
    let sql = "CREATE TABLE a (id INT); ALTER TABLE a ADD CONSTRAINT fk1 FOREIGN KEY (id) REFERENCES b(id);";
    let schema = parse_sql(sql).unwrap();
    let without_alter = parse_sql("CREATE TABLE a (id INT);").unwrap();

    assert!(schema.relationships.is_empty());
    assert_eq!(schema, without_alter);
}

#[test]
fn scenario_e_empty_input() {
    assert_eq!(parse_sql(""), Err(SqlParseError::EmptyInput));
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn mysql_dump_with_every_foreign_key_source() {
    let schema = parse_sql(SHOP_MYSQL).unwrap();

    let names: Vec<&str> = schema.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["users", "orders", "products", "order_items"]);

    assert_eq!(
        schema
            .relationships
            .iter()
            .map(|r| r.id.as_str())
            .collect::<Vec<_>>(),
        vec![
            "orders.user_id->users.id",
            "order_items.order_id->orders.id",
            "order_items.product_id->products.id",
        ]
    );

    let users_id = column(&schema, "users", "id");
    assert!(users_id.is_primary_key && users_id.is_not_null);

    let email = column(&schema, "users", "email");
    assert!(email.is_unique && email.is_not_null && !email.is_primary_key);

    assert_eq!(
        column(&schema, "users", "status").default_value.as_deref(),
        Some("'active'")
    );
    assert_eq!(column(&schema, "orders", "total").typ, "DECIMAL(10,2)");

    let order_id = column(&schema, "order_items", "order_id");
    assert!(order_id.is_primary_key && order_id.is_foreign_key);
    assert_eq!(order_id.references, Some(ColumnRef::new("orders", "id")));
    assert!(!column(&schema, "order_items", "quantity").is_foreign_key);
}

#[test]
fn primary_key_implies_not_null() {
    let schema = parse_sql(SHOP_MYSQL).unwrap();
    for table in &schema.tables {
        for col in &table.columns {
            if col.is_primary_key {
                assert!(col.is_not_null, "{}.{} is a nullable key", table.name, col.name);
            }
        }
    }
}

#[test]
fn relationship_ids_are_unique() {
    // Same key declared inline, at table level and again via ALTER TABLE.
    let schema = parse_sql(
        "CREATE TABLE users (id INT PRIMARY KEY);
         CREATE TABLE orders (
           id INT PRIMARY KEY,
           user_id INT REFERENCES users(id),
           FOREIGN KEY (user_id) REFERENCES users(id)
         );
         ALTER TABLE orders ADD CONSTRAINT fk_user FOREIGN KEY (user_id) REFERENCES users(id);",
    )
    .unwrap();

    assert_eq!(schema.relationships.len(), 1);
    assert_eq!(relationship_ids(&schema).len(), schema.relationships.len());
}

#[test]
fn heuristic_is_gated_by_declared_keys() {
    let schema = parse_sql(
        "CREATE TABLE users (id INT PRIMARY KEY);
         CREATE TABLE products (id INT PRIMARY KEY);
         CREATE TABLE orders (
           id INT PRIMARY KEY,
           user_id INT,
           product_id INT,
           FOREIGN KEY (user_id) REFERENCES users(id)
         );",
    )
    .unwrap();

    assert_eq!(
        relationship_ids(&schema),
        BTreeSet::from(["orders.user_id->users.id".to_string()])
    );
    assert!(!column(&schema, "orders", "product_id").is_foreign_key);
}

#[test]
fn alter_table_on_missing_table_changes_nothing() {
    let base = "CREATE TABLE users (id INT PRIMARY KEY);
                CREATE TABLE orders (id INT PRIMARY KEY, user_id INT REFERENCES users(id));";
    let with_alter = format!(
        "{base}\nALTER TABLE invoices ADD CONSTRAINT fk_inv FOREIGN KEY (order_id) REFERENCES orders(id);"
    );

    assert_eq!(parse_sql(&with_alter).unwrap(), parse_sql(base).unwrap());
}

#[test]
fn relationship_sources_resolve_to_columns() {
    let inputs = [
        SHOP_MYSQL,
        "CREATE TABLE users (id INT PRIMARY KEY);
         CREATE TABLE orders (id INT, user_id INT REFERENCES users(id));
         CREATE TABLE orders (id INT, note TEXT);",
        "CREATE TABLE users (id INT PRIMARY KEY);
         CREATE TABLE orders (id INT, user_id INT, FOREIGN KEY (user_id) REFERENCES users(id));
         CREATE TABLE ORDERS (id INT, buyer_id INT REFERENCES users(id));
         ALTER TABLE orders ADD CONSTRAINT fk_user FOREIGN KEY (user_id) REFERENCES users(id);",
    ];

    for sql in inputs {
        let schema = parse_sql(sql).unwrap();
        for rel in &schema.relationships {
            assert!(
                schema
                    .table(&rel.source_table)
                    .and_then(|t| t.column(&rel.source_column))
                    .is_some(),
                "dangling relationship {}",
                rel.id
            );
        }
    }
}

#[test]
fn redeclared_table_drops_earlier_relationships() {
    let schema = parse_sql(
        "CREATE TABLE users (id INT PRIMARY KEY);
         CREATE TABLE orders (id INT, user_id INT REFERENCES users(id));
         CREATE TABLE orders (id INT, note TEXT);",
    )
    .unwrap();

    let orders = schema.table("orders").unwrap();
    let names: Vec<&str> = orders.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "note"]);
    assert!(schema.relationships.is_empty());
}

#[test]
fn regenerated_ddl_parses_to_same_model() {
    let original = parse_sql(SHOP_MYSQL).unwrap();
    let reparsed = parse_sql(&to_ddl(&original)).unwrap();

    let shape = |schema: &Schema| {
        schema
            .tables
            .iter()
            .map(|t| {
                let cols: Vec<(String, String)> = t
                    .columns
                    .iter()
                    .map(|c| (c.name.clone(), c.typ.clone()))
                    .collect();
                (t.name.clone(), cols)
            })
            .collect::<Vec<_>>()
    };

    assert_eq!(shape(&reparsed), shape(&original));
    assert_eq!(relationship_ids(&reparsed), relationship_ids(&original));
}

#[test]
fn parsing_is_deterministic() {
    let first = serde_json::to_string(&parse_sql(SHOP_MYSQL).unwrap()).unwrap();
    let second = serde_json::to_string(&parse_sql(SHOP_MYSQL).unwrap()).unwrap();
    assert_eq!(first, second);
}

// =============================================================================
// Dialects
// =============================================================================

#[test]
fn postgres_dump() {
    let sql = r#"
        CREATE TABLE "public"."categories" (
            "id" BIGSERIAL PRIMARY KEY,
            "name" TEXT NOT NULL,
            "labels" TEXT[]
        );
        CREATE TABLE "public"."products" (
            "id" BIGSERIAL PRIMARY KEY,
            "category_id" BIGINT,
            "created_at" TIMESTAMPTZ NOT NULL DEFAULT now()
        );
        ALTER TABLE ONLY "public"."products"
            ADD CONSTRAINT "products_category_id_fkey" FOREIGN KEY ("category_id") REFERENCES "public"."categories"("id");
    "#;
    let schema = parse_sql(sql).unwrap();

    assert_eq!(
        relationship_ids(&schema),
        BTreeSet::from(["products.category_id->categories.id".to_string()])
    );
    assert!(column(&schema, "categories", "id").is_primary_key);
    assert!(column(&schema, "products", "category_id").is_integer());
}

#[test]
fn tsql_script() {
    let sql = "
        CREATE TABLE [dbo].[Customers] (
            [CustomerId] INT IDENTITY(1,1) NOT NULL,
            [Name] NVARCHAR(100) NOT NULL
        );
        CREATE TABLE [dbo].[Invoices] (
            [InvoiceId] INT IDENTITY(1,1) NOT NULL,
            [CustomerId] INT NOT NULL,
            CONSTRAINT [FK_Invoices_Customers] FOREIGN KEY ([CustomerId]) REFERENCES [dbo].[Customers] ([CustomerId])
        );
    ";
    let schema = parse_sql(sql).unwrap();

    assert_eq!(
        relationship_ids(&schema),
        BTreeSet::from(["Invoices.CustomerId->Customers.CustomerId".to_string()])
    );
    assert!(column(&schema, "customers", "customerid").is_primary_key);
    assert_eq!(column(&schema, "Customers", "Name").type_family(), "nvarchar");
}

#[test]
fn tsql_alter_with_check_is_unparseable() {
    // `WITH CHECK ADD CONSTRAINT` is not accepted by any supported grammar.
    let sql = "
        CREATE TABLE [dbo].[a] ([Id] INT NOT NULL);
        CREATE TABLE [dbo].[b] ([Id] INT NOT NULL, [AId] INT NOT NULL);
        ALTER TABLE [dbo].[b] WITH CHECK ADD CONSTRAINT [FK_b_a] FOREIGN KEY ([AId]) REFERENCES [dbo].[a] ([Id]);
    ";
    assert_eq!(parse_sql(sql), Err(SqlParseError::UnparseableSql));
}

#[test]
fn forced_dialect_does_not_fall_back() {
    let sql = r#"CREATE TABLE "users" ("id" INT);"#;
    assert_eq!(
        parse_sql_with(sql, &ParseOptions::dialect(Dialect::MySql)),
        Err(SqlParseError::UnparseableSql)
    );
    assert!(parse_sql_with(sql, &ParseOptions::dialect(Dialect::PostgreSql)).is_ok());
}

// =============================================================================
// Output contract
// =============================================================================

#[test]
fn json_output_contract() {
    let schema = parse_sql(
        "CREATE TABLE users (id INT PRIMARY KEY);
         CREATE TABLE orders (id INT PRIMARY KEY, user_id INT, FOREIGN KEY (user_id) REFERENCES users(id));",
    )
    .unwrap();

    let expected = json!({
        "tables": [
            {
                "id": "users",
                "name": "users",
                "columns": [
                    {
                        "name": "id", "type": "INT",
                        "isPrimaryKey": true, "isForeignKey": false,
                        "isNotNull": true, "isUnique": false
                    }
                ]
            },
            {
                "id": "orders",
                "name": "orders",
                "columns": [
                    {
                        "name": "id", "type": "INT",
                        "isPrimaryKey": true, "isForeignKey": false,
                        "isNotNull": true, "isUnique": false
                    },
                    {
                        "name": "user_id", "type": "INT",
                        "isPrimaryKey": false, "isForeignKey": true,
                        "isNotNull": false, "isUnique": false,
                        "references": { "table": "users", "column": "id" }
                    }
                ]
            }
        ],
        "relationships": [
            {
                "id": "orders.user_id->users.id",
                "sourceTable": "orders",
                "sourceColumn": "user_id",
                "targetTable": "users",
                "targetColumn": "id",
                "type": "one-to-many"
            }
        ]
    });

    assert_eq!(serde_json::to_value(&schema).unwrap(), expected);

    let decoded: Schema = serde_json::from_value(expected).unwrap();
    assert_eq!(decoded, schema);
}
