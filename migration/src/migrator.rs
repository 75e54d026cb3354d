use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202601100001_create_users::Migration),
            Box::new(migrations::m202601100002_create_class_categories::Migration),
            Box::new(migrations::m202601100003_create_classes::Migration),
            Box::new(migrations::m202601100004_create_class_enrollments::Migration),
            Box::new(migrations::m202601100005_create_trainer_reviews::Migration),
            Box::new(migrations::m202601100006_create_payment_proofs::Migration),
            Box::new(migrations::m202601100007_create_membership_purchases::Migration),
            Box::new(migrations::m202601100008_create_contact_requests::Migration),
        ]
    }
}
