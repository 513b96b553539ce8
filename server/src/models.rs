use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sessions)]
pub struct NewSession<'a> {
    pub user_id: Uuid,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub prep_time: i32,
    pub cook_time: i32,
    pub total_time: i32,
    pub servings: i32,
    pub source_url: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub user_id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub instructions: &'a str,
    pub prep_time: i32,
    pub cook_time: i32,
    pub total_time: i32,
    pub servings: i32,
    pub source_url: Option<&'a str>,
    pub image_url: Option<&'a str>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::ingredients)]
pub struct NewIngredient<'a> {
    pub name: &'a str,
    pub description: &'a str,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::recipe_ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct RecipeIngredient {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub quantity: f64,
    pub unit: String,
    pub notes: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_ingredients)]
pub struct NewRecipeIngredient<'a> {
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub quantity: f64,
    pub unit: &'a str,
    pub notes: &'a str,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::meal_plans)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct MealPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub meal_date: NaiveDate,
    pub meal_type: String,
    pub servings: i32,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::meal_plans)]
pub struct NewMealPlan<'a> {
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub meal_date: NaiveDate,
    pub meal_type: &'a str,
    pub servings: i32,
    pub notes: &'a str,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::grocery_lists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GroceryList {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::grocery_lists)]
pub struct NewGroceryList<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::grocery_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GroceryItem {
    pub id: Uuid,
    pub grocery_list_id: Uuid,
    pub ingredient_id: Uuid,
    pub quantity: f64,
    pub unit: String,
    pub purchased: bool,
    pub notes: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::grocery_items)]
pub struct NewGroceryItem<'a> {
    pub grocery_list_id: Uuid,
    pub ingredient_id: Uuid,
    pub quantity: f64,
    pub unit: &'a str,
    pub notes: &'a str,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::yearly_goals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct YearlyGoal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::yearly_goals)]
pub struct NewYearlyGoal<'a> {
    pub user_id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::quarterly_goals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct QuarterlyGoal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub yearly_goal_id: Option<Uuid>,
    pub quarter: i16,
    pub life_sector: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::quarterly_goals)]
pub struct NewQuarterlyGoal<'a> {
    pub user_id: Uuid,
    pub yearly_goal_id: Option<Uuid>,
    pub quarter: i16,
    pub life_sector: &'a str,
    pub description: &'a str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::kpis)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Kpi {
    pub id: Uuid,
    pub user_id: Uuid,
    pub quarterly_goal_id: Uuid,
    pub name: String,
    pub description: String,
    pub frequency: String,
    pub target_value: Option<i32>,
    pub unit: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::kpis)]
pub struct NewKpi<'a> {
    pub user_id: Uuid,
    pub quarterly_goal_id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub frequency: &'a str,
    pub target_value: Option<i32>,
    pub unit: &'a str,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::kpi_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct KpiRecord {
    pub id: Uuid,
    pub kpi_id: Uuid,
    pub entry_date: NaiveDate,
    pub value: f64,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::kpi_records)]
pub struct NewKpiRecord<'a> {
    pub kpi_id: Uuid,
    pub entry_date: NaiveDate,
    pub value: f64,
    pub notes: &'a str,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::journal_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct JournalEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::journal_entries)]
pub struct NewJournalEntry<'a> {
    pub user_id: Uuid,
    pub content: &'a str,
}
