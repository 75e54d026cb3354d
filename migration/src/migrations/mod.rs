pub mod m202601100001_create_users;
pub mod m202601100002_create_class_categories;
pub mod m202601100003_create_classes;
pub mod m202601100004_create_class_enrollments;
pub mod m202601100005_create_trainer_reviews;
pub mod m202601100006_create_payment_proofs;
pub mod m202601100007_create_membership_purchases;
pub mod m202601100008_create_contact_requests;
