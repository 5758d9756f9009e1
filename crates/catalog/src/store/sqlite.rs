use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_query::{Expr, ExprTrait, Order, Query, SelectStatement, SqliteQueryBuilder, Value};
use sea_query_sqlx::SqlxBinder;
use sqlx::{
    FromRow, SqlitePool,
    types::{Json, Text},
};
use time::OffsetDateTime;
use umami_db::table::{Alias, Chemistry, Flags, Ingredient, Tcm};
use umami_shared::{
    Error, IngredientDetail, IngredientSummary, NewIngredient, Page, RawChemistry, Result,
};

use super::{IngredientStore, SimilarityMode, StoreQuery};
use crate::{NameEntry, Predicate, TagField, TextField};

/// Catalog persisted in SQLite.
///
/// Reads go through `read_db`, every write runs in a transaction on `write_db`.
#[derive(Clone)]
pub struct SqliteStore {
    read_db: SqlitePool,
    write_db: SqlitePool,
    mode: SimilarityMode,
}

impl SqliteStore {
    pub fn new(read_db: SqlitePool, write_db: SqlitePool, mode: SimilarityMode) -> Self {
        Self {
            read_db,
            write_db,
            mode,
        }
    }
}

impl SqliteStore {
    /// Aliases in insertion order, grouped by ingredient. All of them when no
    /// id is given.
    async fn aliases(&self, id: Option<i64>) -> Result<HashMap<i64, Vec<umami_shared::Alias>>> {
        let mut statement = Query::select()
            .columns([Alias::IngredientId, Alias::Name, Alias::Language])
            .from(Alias::Table)
            .order_by(Alias::Id, Order::Asc)
            .to_owned();
        if let Some(id) = id {
            statement.and_where(Expr::col(Alias::IngredientId).eq(id));
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let mut aliases: HashMap<i64, Vec<umami_shared::Alias>> = HashMap::new();
        for (ingredient_id, name, language) in
            sqlx::query_as_with::<_, (i64, String, String), _>(&sql, values)
                .fetch_all(&self.read_db)
                .await
                .map_err(unavailable)?
        {
            aliases
                .entry(ingredient_id)
                .or_default()
                .push(umami_shared::Alias { name, language });
        }

        Ok(aliases)
    }
}

fn unavailable(err: sqlx::Error) -> Error {
    tracing::error!(error = %err, "ingredient store query failed");
    Error::unavailable(err)
}

#[derive(FromRow)]
struct SummaryRow {
    id: i64,
    base_name: String,
    display_name: Option<String>,
    category: Option<String>,
    glu: Option<Text<Decimal>>,
    asp: Option<Text<Decimal>>,
    imp: Option<Text<Decimal>>,
    gmp: Option<Text<Decimal>>,
    amp: Option<Text<Decimal>>,
    umami_aa: Option<Text<Decimal>>,
    umami_nuc: Option<Text<Decimal>>,
    umami_synergy: Option<Text<Decimal>>,
    four_qi: Option<Json<Vec<String>>>,
    five_flavors: Option<Json<Vec<String>>>,
    meridians: Option<Json<Vec<String>>>,
    overview: Option<String>,
    confidence: Option<Text<Decimal>>,
    allergens: Option<Json<Vec<String>>>,
    dietary_restrictions: Option<Json<Vec<String>>>,
    umami_tags: Option<Json<Vec<String>>>,
    flavor_tags: Option<Json<Vec<String>>>,
}

#[derive(FromRow)]
struct DetailRow {
    #[sqlx(flatten)]
    summary: SummaryRow,
    extraction_temp: Option<Text<Decimal>>,
    extraction_time: Option<i64>,
    cooking_overview: Option<String>,
}

impl DetailRow {
    fn into_detail(self, aliases: Vec<umami_shared::Alias>) -> IngredientDetail {
        IngredientDetail {
            summary: self.summary.into(),
            aliases,
            extraction_temp: self.extraction_temp.map(|t| t.0),
            extraction_time: self.extraction_time,
            cooking_overview: self.cooking_overview,
        }
    }
}

fn decimal(value: Option<Text<Decimal>>) -> Decimal {
    value.map(|v| v.0).unwrap_or_default()
}

fn tags(value: Option<Json<Vec<String>>>) -> Vec<String> {
    value.map(|v| v.0).unwrap_or_default()
}

impl From<SummaryRow> for IngredientSummary {
    fn from(row: SummaryRow) -> Self {
        let raw = RawChemistry::new(
            decimal(row.glu),
            decimal(row.asp),
            decimal(row.imp),
            decimal(row.gmp),
            decimal(row.amp),
        );

        Self {
            id: row.id,
            base_name: row.base_name,
            display_name: row.display_name,
            category: row.category,
            chemistry: umami_shared::Chemistry::from_stored(
                raw,
                decimal(row.umami_aa),
                decimal(row.umami_nuc),
                decimal(row.umami_synergy),
            ),
            tcm: umami_shared::Tcm {
                four_qi: tags(row.four_qi),
                five_flavors: tags(row.five_flavors),
                meridians: tags(row.meridians),
                overview: row.overview,
                confidence: decimal(row.confidence),
            },
            flags: umami_shared::Flags {
                allergens: tags(row.allergens),
                dietary_restrictions: tags(row.dietary_restrictions),
                umami_tags: tags(row.umami_tags),
                flavor_tags: tags(row.flavor_tags),
            },
        }
    }
}

fn joined(statement: &mut SelectStatement) -> &mut SelectStatement {
    statement
        .from(Ingredient::Table)
        .left_join(
            Chemistry::Table,
            Expr::col((Chemistry::Table, Chemistry::IngredientId))
                .equals((Ingredient::Table, Ingredient::Id)),
        )
        .left_join(
            Tcm::Table,
            Expr::col((Tcm::Table, Tcm::IngredientId)).equals((Ingredient::Table, Ingredient::Id)),
        )
        .left_join(
            Flags::Table,
            Expr::col((Flags::Table, Flags::IngredientId))
                .equals((Ingredient::Table, Ingredient::Id)),
        )
}

fn select_summary() -> SelectStatement {
    let mut statement = Query::select()
        .columns([
            (Ingredient::Table, Ingredient::Id),
            (Ingredient::Table, Ingredient::BaseName),
            (Ingredient::Table, Ingredient::DisplayName),
            (Ingredient::Table, Ingredient::Category),
        ])
        .columns([
            (Chemistry::Table, Chemistry::Glu),
            (Chemistry::Table, Chemistry::Asp),
            (Chemistry::Table, Chemistry::Imp),
            (Chemistry::Table, Chemistry::Gmp),
            (Chemistry::Table, Chemistry::Amp),
            (Chemistry::Table, Chemistry::UmamiAa),
            (Chemistry::Table, Chemistry::UmamiNuc),
            (Chemistry::Table, Chemistry::UmamiSynergy),
        ])
        .columns([
            (Tcm::Table, Tcm::FourQi),
            (Tcm::Table, Tcm::FiveFlavors),
            (Tcm::Table, Tcm::Meridians),
            (Tcm::Table, Tcm::Overview),
            (Tcm::Table, Tcm::Confidence),
        ])
        .columns([
            (Flags::Table, Flags::Allergens),
            (Flags::Table, Flags::DietaryRestrictions),
            (Flags::Table, Flags::UmamiTags),
            (Flags::Table, Flags::FlavorTags),
        ])
        .to_owned();

    joined(&mut statement);

    statement
}

fn select_detail() -> SelectStatement {
    select_summary()
        .columns([
            (Ingredient::Table, Ingredient::ExtractionTemp),
            (Ingredient::Table, Ingredient::ExtractionTime),
            (Ingredient::Table, Ingredient::CookingOverview),
        ])
        .to_owned()
}

fn tag_sql(field: TagField) -> &'static str {
    match field {
        TagField::Allergens => r#""flags"."allergens""#,
        TagField::DietaryRestrictions => r#""flags"."dietary_restrictions""#,
        TagField::FourQi => r#""tcm"."four_qi""#,
        TagField::FiveFlavors => r#""tcm"."five_flavors""#,
        TagField::Meridians => r#""tcm"."meridians""#,
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Renders the clauses SQLite evaluates exactly as a parameterised condition,
/// pushing bound values in placeholder order.
///
/// `None` for clauses left to [`Predicate::matches`]: SQLite folds case for
/// ASCII only, compares cached decimals as lossy REALs and caps bound
/// parameters.
fn render(predicate: &Predicate, values: &mut Vec<Value>) -> Option<String> {
    let sql = match predicate {
        Predicate::And { all } if all.is_empty() => "1 = 1".to_owned(),
        Predicate::And { all } => format!(
            "({})",
            all.iter()
                .map(|p| render(p, values))
                .collect::<Option<Vec<_>>>()?
                .join(" AND ")
        ),
        Predicate::Or { any } if any.is_empty() => "1 = 0".to_owned(),
        Predicate::Or { any } => format!(
            "({})",
            any.iter()
                .map(|p| render(p, values))
                .collect::<Option<Vec<_>>>()?
                .join(" OR ")
        ),
        Predicate::Not { not } => format!("NOT ({})", render(not, values)?),
        Predicate::HasTag { field, tag } => {
            values.push(tag.clone().into());

            format!(
                "EXISTS (SELECT 1 FROM json_each(COALESCE({}, '[]')) WHERE json_each.value = ?)",
                tag_sql(*field)
            )
        }
        Predicate::NoTags { field } => {
            format!("json_array_length(COALESCE({}, '[]')) = 0", tag_sql(*field))
        }
        Predicate::CategoryIn { categories } if categories.is_empty() => "1 = 0".to_owned(),
        Predicate::CategoryIn { categories } => {
            values.extend(categories.iter().map(|c| Value::from(c.clone())));

            format!(
                r#"COALESCE("ingredient"."category", '') IN ({})"#,
                placeholders(categories.len())
            )
        }
        Predicate::Compare { .. }
        | Predicate::Exceeds { .. }
        | Predicate::TextContains { .. }
        | Predicate::IdIn { .. } => return None,
    };

    Some(sql)
}

/// Splits the top-level conjunction into a SQL prefilter and the clauses
/// still to be checked on each fetched row.
fn split(predicate: &Predicate) -> (Option<Expr>, Vec<&Predicate>) {
    let clauses = match predicate {
        Predicate::And { all } => all.iter().collect::<Vec<_>>(),
        other => vec![other],
    };

    let mut pushed = Vec::new();
    let mut values = Vec::new();
    let mut residual = Vec::new();

    for clause in clauses {
        let mut bound = Vec::new();
        match render(clause, &mut bound) {
            Some(sql) => {
                pushed.push(sql);
                values.extend(bound);
            }
            None => residual.push(clause),
        }
    }

    let prefilter =
        (!pushed.is_empty()).then(|| Expr::cust_with_values(pushed.join(" AND "), values));

    (prefilter, residual)
}

fn reads_aliases(predicate: &Predicate) -> bool {
    match predicate {
        Predicate::And { all } => all.iter().any(reads_aliases),
        Predicate::Or { any } => any.iter().any(reads_aliases),
        Predicate::Not { not } => reads_aliases(not),
        Predicate::TextContains { fields, .. } => fields.contains(&TextField::Alias),
        _ => false,
    }
}

fn json(tags: &[String]) -> Result<String> {
    serde_json::to_string(tags).map_err(Error::unavailable)
}

#[async_trait::async_trait]
impl IngredientStore for SqliteStore {
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: i64) -> Result<IngredientDetail> {
        let statement = select_detail()
            .and_where(Expr::col((Ingredient::Table, Ingredient::Id)).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let row = sqlx::query_as_with::<_, DetailRow, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await
            .map_err(unavailable)?
            .ok_or(Error::NotFound(id))?;

        let mut aliases = self.aliases(Some(id)).await?;

        Ok(row.into_detail(aliases.remove(&id).unwrap_or_default()))
    }

    #[tracing::instrument(skip_all, fields(page = query.page.number, size = query.page.size))]
    async fn find(&self, query: &StoreQuery) -> Result<Page<IngredientSummary>> {
        let (prefilter, residual) = split(&query.predicate);

        let mut statement = select_detail();
        if let Some(prefilter) = prefilter {
            statement.and_where(prefilter);
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, DetailRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await
            .map_err(unavailable)?;

        let candidates = rows.len();
        let mut aliases = if residual.iter().any(|clause| reads_aliases(clause)) {
            self.aliases(None).await?
        } else {
            HashMap::new()
        };

        let mut matches: Vec<IngredientSummary> = rows
            .into_iter()
            .map(|row| {
                let id = row.summary.id;
                row.into_detail(aliases.remove(&id).unwrap_or_default())
            })
            .filter(|detail| residual.iter().all(|clause| clause.matches(detail)))
            .map(|detail| detail.summary)
            .collect();

        matches.sort_by(|a, b| query.order.compare(a, b, query.relevance.as_ref()));

        tracing::debug!(candidates, matches = matches.len(), "filtered");

        let count = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip(query.page.offset() as usize)
            .take(query.page.limit() as usize)
            .collect();

        Ok(Page { count, items })
    }

    #[tracing::instrument(skip(self))]
    async fn count(&self) -> Result<u64> {
        let (sql, values) = Query::select()
            .expr(Expr::cust("COUNT(*)"))
            .from(Ingredient::Table)
            .build_sqlx(SqliteQueryBuilder);

        let (count,): (i64,) = sqlx::query_as_with(&sql, values)
            .fetch_one(&self.read_db)
            .await
            .map_err(unavailable)?;

        Ok(count as u64)
    }

    #[tracing::instrument(skip(self))]
    async fn name_entries(&self) -> Result<Vec<NameEntry>> {
        let (sql, values) = Query::select()
            .columns([
                Ingredient::Id,
                Ingredient::BaseName,
                Ingredient::DisplayName,
            ])
            .from(Ingredient::Table)
            .order_by(Ingredient::Id, Order::Asc)
            .build_sqlx(SqliteQueryBuilder);

        let names = sqlx::query_as_with::<_, (i64, String, Option<String>), _>(&sql, values)
            .fetch_all(&self.read_db)
            .await
            .map_err(unavailable)?;

        let mut aliases = self.aliases(None).await?;

        Ok(names
            .into_iter()
            .map(|(id, base_name, display_name)| NameEntry {
                id,
                base_name,
                display_name,
                aliases: aliases
                    .remove(&id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|alias| alias.name)
                    .collect(),
            })
            .collect())
    }

    #[tracing::instrument(skip_all, fields(base_name = %ingredient.base_name))]
    async fn upsert(&self, ingredient: NewIngredient) -> Result<i64> {
        let requested_id = ingredient.id;
        let detail = ingredient.into_detail(requested_id.unwrap_or_default())?;
        let summary = &detail.summary;
        let now = OffsetDateTime::now_utc().unix_timestamp();

        let mut tx = self.write_db.begin().await.map_err(unavailable)?;

        let (sql, values) = Query::select()
            .column(Ingredient::Id)
            .from(Ingredient::Table)
            .and_where(Expr::col(Ingredient::BaseName).eq(summary.base_name.clone()))
            .build_sqlx(SqliteQueryBuilder);
        let owner = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
            .fetch_optional(&mut *tx)
            .await
            .map_err(unavailable)?
            .map(|(id,)| id);

        let existing = match (requested_id, owner) {
            (Some(id), Some(owner)) if id != owner => {
                return Err(Error::invalid(
                    "base_name",
                    format!("already used by ingredient {owner}"),
                ));
            }
            (Some(id), _) => {
                let (sql, values) = Query::select()
                    .column(Ingredient::Id)
                    .from(Ingredient::Table)
                    .and_where(Expr::col(Ingredient::Id).eq(id))
                    .build_sqlx(SqliteQueryBuilder);
                sqlx::query_as_with::<_, (i64,), _>(&sql, values)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(unavailable)?
                    .map(|(id,)| id)
            }
            (None, owner) => owner,
        };

        let extraction_temp = detail.extraction_temp.map(|t| t.to_string());

        let id = match existing {
            Some(id) => {
                let (sql, values) = Query::update()
                    .table(Ingredient::Table)
                    .values([
                        (Ingredient::BaseName, summary.base_name.clone().into()),
                        (Ingredient::DisplayName, summary.display_name.clone().into()),
                        (Ingredient::Category, summary.category.clone().into()),
                        (Ingredient::ExtractionTemp, extraction_temp.into()),
                        (Ingredient::ExtractionTime, detail.extraction_time.into()),
                        (
                            Ingredient::CookingOverview,
                            detail.cooking_overview.clone().into(),
                        ),
                        (Ingredient::UpdatedAt, now.into()),
                    ])
                    .and_where(Expr::col(Ingredient::Id).eq(id))
                    .build_sqlx(SqliteQueryBuilder);
                sqlx::query_with(&sql, values)
                    .execute(&mut *tx)
                    .await
                    .map_err(unavailable)?;

                for statement in [
                    Query::delete()
                        .from_table(Alias::Table)
                        .and_where(Expr::col(Alias::IngredientId).eq(id))
                        .to_owned(),
                    Query::delete()
                        .from_table(Chemistry::Table)
                        .and_where(Expr::col(Chemistry::IngredientId).eq(id))
                        .to_owned(),
                    Query::delete()
                        .from_table(Tcm::Table)
                        .and_where(Expr::col(Tcm::IngredientId).eq(id))
                        .to_owned(),
                    Query::delete()
                        .from_table(Flags::Table)
                        .and_where(Expr::col(Flags::IngredientId).eq(id))
                        .to_owned(),
                ] {
                    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
                    sqlx::query_with(&sql, values)
                        .execute(&mut *tx)
                        .await
                        .map_err(unavailable)?;
                }

                id
            }
            None => {
                let mut columns = vec![
                    Ingredient::BaseName,
                    Ingredient::DisplayName,
                    Ingredient::Category,
                    Ingredient::ExtractionTemp,
                    Ingredient::ExtractionTime,
                    Ingredient::CookingOverview,
                    Ingredient::CreatedAt,
                    Ingredient::UpdatedAt,
                ];
                let mut row: Vec<Expr> = vec![
                    summary.base_name.clone().into(),
                    summary.display_name.clone().into(),
                    summary.category.clone().into(),
                    extraction_temp.into(),
                    detail.extraction_time.into(),
                    detail.cooking_overview.clone().into(),
                    now.into(),
                    now.into(),
                ];

                if let Some(id) = requested_id {
                    columns.push(Ingredient::Id);
                    row.push(id.into());
                }

                let statement = Query::insert()
                    .into_table(Ingredient::Table)
                    .columns(columns)
                    .values_panic(row)
                    .to_owned();

                let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
                sqlx::query_with(&sql, values)
                    .execute(&mut *tx)
                    .await
                    .map_err(unavailable)?
                    .last_insert_rowid()
            }
        };

        let chemistry = &summary.chemistry;
        let raw = chemistry.raw();
        let mut statements = vec![
            Query::insert()
                .into_table(Chemistry::Table)
                .columns([
                    Chemistry::IngredientId,
                    Chemistry::Glu,
                    Chemistry::Asp,
                    Chemistry::Imp,
                    Chemistry::Gmp,
                    Chemistry::Amp,
                    Chemistry::UmamiAa,
                    Chemistry::UmamiNuc,
                    Chemistry::UmamiSynergy,
                ])
                .values_panic([
                    id.into(),
                    raw.glu.to_string().into(),
                    raw.asp.to_string().into(),
                    raw.imp.to_string().into(),
                    raw.gmp.to_string().into(),
                    raw.amp.to_string().into(),
                    chemistry.umami_aa().to_string().into(),
                    chemistry.umami_nuc().to_string().into(),
                    chemistry.umami_synergy().to_string().into(),
                ])
                .to_owned(),
            Query::insert()
                .into_table(Flags::Table)
                .columns([
                    Flags::IngredientId,
                    Flags::Allergens,
                    Flags::DietaryRestrictions,
                    Flags::UmamiTags,
                    Flags::FlavorTags,
                ])
                .values_panic([
                    id.into(),
                    json(&summary.flags.allergens)?.into(),
                    json(&summary.flags.dietary_restrictions)?.into(),
                    json(&summary.flags.umami_tags)?.into(),
                    json(&summary.flags.flavor_tags)?.into(),
                ])
                .to_owned(),
        ];

        if !summary.tcm.four_qi.is_empty() {
            statements.push(
                Query::insert()
                    .into_table(Tcm::Table)
                    .columns([
                        Tcm::IngredientId,
                        Tcm::FourQi,
                        Tcm::FiveFlavors,
                        Tcm::Meridians,
                        Tcm::Overview,
                        Tcm::Confidence,
                    ])
                    .values_panic([
                        id.into(),
                        json(&summary.tcm.four_qi)?.into(),
                        json(&summary.tcm.five_flavors)?.into(),
                        json(&summary.tcm.meridians)?.into(),
                        summary.tcm.overview.clone().into(),
                        summary.tcm.confidence.to_string().into(),
                    ])
                    .to_owned(),
            );
        }

        for alias in &detail.aliases {
            statements.push(
                Query::insert()
                    .into_table(Alias::Table)
                    .columns([Alias::IngredientId, Alias::Name, Alias::Language])
                    .values_panic([
                        id.into(),
                        alias.name.clone().into(),
                        alias.language.clone().into(),
                    ])
                    .to_owned(),
            );
        }

        for statement in statements {
            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            sqlx::query_with(&sql, values)
                .execute(&mut *tx)
                .await
                .map_err(unavailable)?;
        }

        tx.commit().await.map_err(unavailable)?;

        tracing::debug!(id, "ingredient upserted");

        Ok(id)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.write_db.begin().await.map_err(unavailable)?;

        for statement in [
            Query::delete()
                .from_table(Alias::Table)
                .and_where(Expr::col(Alias::IngredientId).eq(id))
                .to_owned(),
            Query::delete()
                .from_table(Chemistry::Table)
                .and_where(Expr::col(Chemistry::IngredientId).eq(id))
                .to_owned(),
            Query::delete()
                .from_table(Tcm::Table)
                .and_where(Expr::col(Tcm::IngredientId).eq(id))
                .to_owned(),
            Query::delete()
                .from_table(Flags::Table)
                .and_where(Expr::col(Flags::IngredientId).eq(id))
                .to_owned(),
        ] {
            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            sqlx::query_with(&sql, values)
                .execute(&mut *tx)
                .await
                .map_err(unavailable)?;
        }

        let (sql, values) = Query::delete()
            .from_table(Ingredient::Table)
            .and_where(Expr::col(Ingredient::Id).eq(id))
            .build_sqlx(SqliteQueryBuilder);
        let deleted = sqlx::query_with(&sql, values)
            .execute(&mut *tx)
            .await
            .map_err(unavailable)?
            .rows_affected();

        if deleted == 0 {
            return Err(Error::NotFound(id));
        }

        tx.commit().await.map_err(unavailable)?;

        Ok(())
    }

    fn similarity_mode(&self) -> SimilarityMode {
        self.mode
    }
}
