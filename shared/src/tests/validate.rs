use crate::account::handle::{SetPasswordDescriptor, UserDescriptor};
use crate::account::{Claims, Role};
use crate::campus::CampusDescriptor;
use crate::validate::{non_blank, Validate};
use crate::ErrorBody;

#[test]
fn error_detail_shapes() {
    let body: ErrorBody =
        serde_json::from_str(r#"{"detail":"Aluno já inscrito neste evento."}"#).unwrap();
    assert_eq!(body.detail.message(), Some("Aluno já inscrito neste evento."));

    let body: ErrorBody = serde_json::from_str(
        r#"{"detail":[{"msg":"field required","loc":["body","nome_aluno"]},{"msg":"other"}]}"#,
    )
    .unwrap();
    assert_eq!(body.detail.message(), Some("field required"));

    let body: ErrorBody = serde_json::from_str(r#"{"detail":[]}"#).unwrap();
    assert_eq!(body.detail.message(), None);
}

#[test]
fn user_descriptor_validation() {
    let mut descriptor = UserDescriptor {
        name: "Carla".to_owned(),
        email: "carla@example.com".to_owned(),
        password: None,
        role: Role::Professor,
        active: true,
        campus_id: None,
    };
    assert!(descriptor.validate().is_ok());
    assert!(descriptor.validate_create().is_err());

    descriptor.password = Some("short".to_owned());
    assert_eq!(descriptor.validate().unwrap_err()[0].field, "password");

    descriptor.password = Some("long enough".to_owned());
    assert!(descriptor.validate_create().is_ok());

    let value = serde_json::to_value(&descriptor).unwrap();
    assert_eq!(value["tipo"], "professor");
    assert_eq!(value["ativo"], true);
}

#[test]
fn set_password_confirmation() {
    let descriptor = SetPasswordDescriptor {
        email: "carla@example.com".to_owned(),
        code: "123456".to_owned(),
        password: "password123".to_owned(),
        confirmation: "password124".to_owned(),
    };
    let errors = descriptor.validate().unwrap_err();
    assert_eq!(errors[0].field, "confirmation");

    let value = serde_json::to_value(&descriptor).unwrap();
    assert!(value.get("confirmation").is_none());
    assert_eq!(value["codigo"], "123456");
}

#[test]
fn campus_name_length() {
    assert!(CampusDescriptor { name: "Ji".to_owned() }.validate().is_err());
    assert!(CampusDescriptor {
        name: "Ji-Paraná".to_owned()
    }
    .validate()
    .is_ok());
}

#[test]
fn claims_wire_format() {
    let claims: Claims =
        serde_json::from_str(r#"{"sub":"ana@example.com","tipo":"admin","exp":1700000000}"#)
            .unwrap();
    assert_eq!(claims.role, Role::Admin);
    assert_eq!("professor".parse::<Role>(), Ok(Role::Professor));
}

#[test]
fn blank_optional_inputs() {
    assert_eq!(non_blank(Some("  ".to_owned())), None);
    assert_eq!(non_blank(Some(" 2025 ".to_owned())), Some("2025".to_owned()));
    assert_eq!(non_blank(None), None);
}
