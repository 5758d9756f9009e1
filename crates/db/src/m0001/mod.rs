mod alias;
mod chemistry;
mod flags;
mod ingredient;
mod tcm;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "umami",
    "m0001",
    vec_box![],
    vec_box![
        ingredient::CreateTable,
        ingredient::CreateUk1,
        ingredient::CreateIdx1,
        alias::CreateTable,
        alias::CreateIdx1,
        chemistry::CreateTable,
        tcm::CreateTable,
        flags::CreateTable
    ]
);
