use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Profiles {
    Table,
    Id,
    Username,
    UserIndex,
    Nickname,
    DarkMode,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Addresses {
    Table,
    Id,
    Slug,
    SlugIndex,
    #[iden = "address_line_1"]
    AddressLine1,
    #[iden = "address_line_2"]
    AddressLine2,
    City,
    State,
    Zip,
    Country,
    IsCurrent,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Phones {
    Table,
    Id,
    Slug,
    SlugIndex,
    CountryCode,
    PhoneNumber,
    Extension,
    PhoneType,
    IsCurrent,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ProfileAddresses {
    Table,
    Id,
    ProfileId,
    AddressId,
    CreatedAt,
}

#[derive(Iden)]
enum ProfilePhones {
    Table,
    Id,
    ProfileId,
    PhoneId,
    CreatedAt,
}

// uuid text keys; ciphertext and blind indexes are opaque text
fn id_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .string_len(36)
        .not_null()
        .primary_key()
        .to_owned()
}

fn index_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).string_len(64).not_null().to_owned()
}

fn timestamp_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(id_col(Profiles::Id))
                    .col(ColumnDef::new(Profiles::Username).text().not_null())
                    .col(index_col(Profiles::UserIndex))
                    .col(ColumnDef::new(Profiles::Nickname).text().null())
                    .col(
                        ColumnDef::new(Profiles::DarkMode)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(timestamp_col(Profiles::CreatedAt))
                    .col(timestamp_col(Profiles::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_profiles_user_index")
                    .table(Profiles::Table)
                    .col(Profiles::UserIndex)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Addresses::Table)
                    .if_not_exists()
                    .col(id_col(Addresses::Id))
                    .col(ColumnDef::new(Addresses::Slug).text().not_null())
                    .col(index_col(Addresses::SlugIndex))
                    .col(ColumnDef::new(Addresses::AddressLine1).text().not_null())
                    .col(ColumnDef::new(Addresses::AddressLine2).text().null())
                    .col(ColumnDef::new(Addresses::City).text().not_null())
                    .col(ColumnDef::new(Addresses::State).text().not_null())
                    .col(ColumnDef::new(Addresses::Zip).text().not_null())
                    .col(ColumnDef::new(Addresses::Country).text().not_null())
                    .col(
                        ColumnDef::new(Addresses::IsCurrent)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(timestamp_col(Addresses::CreatedAt))
                    .col(timestamp_col(Addresses::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_addresses_slug_index")
                    .table(Addresses::Table)
                    .col(Addresses::SlugIndex)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Phones::Table)
                    .if_not_exists()
                    .col(id_col(Phones::Id))
                    .col(ColumnDef::new(Phones::Slug).text().not_null())
                    .col(index_col(Phones::SlugIndex))
                    .col(ColumnDef::new(Phones::CountryCode).text().null())
                    .col(ColumnDef::new(Phones::PhoneNumber).text().not_null())
                    .col(ColumnDef::new(Phones::Extension).text().null())
                    .col(ColumnDef::new(Phones::PhoneType).text().not_null())
                    .col(
                        ColumnDef::new(Phones::IsCurrent)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(timestamp_col(Phones::CreatedAt))
                    .col(timestamp_col(Phones::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_phones_slug_index")
                    .table(Phones::Table)
                    .col(Phones::SlugIndex)
                    .to_owned(),
            )
            .await?;

        // Join tables: surrogate key + creation time, no cascades.
        manager
            .create_table(
                Table::create()
                    .table(ProfileAddresses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProfileAddresses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProfileAddresses::ProfileId).string_len(36).not_null())
                    .col(ColumnDef::new(ProfileAddresses::AddressId).string_len(36).not_null())
                    .col(timestamp_col(ProfileAddresses::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_profile_addresses_profile_id")
                    .table(ProfileAddresses::Table)
                    .col(ProfileAddresses::ProfileId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_profile_addresses_address_id")
                    .table(ProfileAddresses::Table)
                    .col(ProfileAddresses::AddressId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProfilePhones::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProfilePhones::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProfilePhones::ProfileId).string_len(36).not_null())
                    .col(ColumnDef::new(ProfilePhones::PhoneId).string_len(36).not_null())
                    .col(timestamp_col(ProfilePhones::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_profile_phones_profile_id")
                    .table(ProfilePhones::Table)
                    .col(ProfilePhones::ProfileId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_profile_phones_phone_id")
                    .table(ProfilePhones::Table)
                    .col(ProfilePhones::PhoneId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProfilePhones::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProfileAddresses::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Phones::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Addresses::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
