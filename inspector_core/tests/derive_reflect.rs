// inspector_core/tests/derive_reflect.rs
use inspector_core::reflect::*;
use inspector_core::serialization::ListReferenceOperator;
use inspector_core::InspectorError;

#[derive(inspector_core::Reflect, Default)]
struct Body {
    pub mass: f32,
    #[reflect(order = -1)]
    pub kind: String,
}

#[derive(inspector_core::Reflect, Default)]
#[reflect(
    method(call = jump, name = "Jump!", order = 0),
    method = rest,
    property(name = "speed_squared", ty = f32, get = Hero::speed_squared),
    property(name = "title", ty = String, get = Hero::title, set = Hero::set_title, order = 1.5)
)]
struct Hero {
    #[reflect(base)]
    body: Body,
    #[reflect(name = "Hit Points", tooltip = "Current health", order = 2)]
    pub hp: i32,
    pub speed: f32,
    #[reflect(skip)]
    pub cache: u8,
    nickname: String,
    jumps: u32,
}

impl Hero {
    fn speed_squared(&self) -> f32 {
        self.speed * self.speed
    }

    fn title(&self) -> String {
        format!("Sir {}", self.nickname)
    }

    fn set_title(&mut self, title: String) {
        self.nickname = title.trim_start_matches("Sir ").to_string();
    }

    fn jump(&mut self) {
        self.jumps += 1;
    }

    fn rest(&mut self) {
        self.hp = 100;
    }
}

#[derive(inspector_core::Reflect, Default)]
struct HeavyBody {
    #[reflect(base)]
    body: Body,
    #[reflect(name = "Weight")]
    pub mass: f32,
}

#[derive(inspector_core::Reflect)]
#[reflect(no_default, construct_with = Portal::closed)]
struct Portal {
    pub open: bool,
}

impl Portal {
    fn closed() -> Self {
        Self { open: false }
    }
}

fn names(descriptor: &TypeDescriptor, filter: &dyn MemberFilter) -> Vec<String> {
    descriptor
        .members_matching(filter)
        .iter()
        .map(|member| member.name().to_string())
        .collect()
}

#[test]
fn members_are_ordered_with_base_first_and_methods_last() {
    let descriptor = type_cache().get::<Hero>();
    assert_eq!(
        names(&descriptor, &ALL_MEMBERS),
        ["kind", "mass", "title", "hp", "speed", "nickname", "jumps", "speed_squared", "jump", "rest"]
    );
    assert_eq!(names(&descriptor, &BUTTON_MEMBERS), ["jump", "rest"]);
    assert_eq!(
        names(&descriptor, &SERIALIZABLE_MEMBERS),
        ["kind", "mass", "title", "hp", "speed"]
    );
}

#[test]
fn attributes_shape_display_names_and_access() {
    let descriptor = type_cache().get::<Hero>();

    let hp = descriptor.member("hp").unwrap();
    assert_eq!(hp.display_name(), "Hit Points");
    assert_eq!(hp.tooltip(), Some("Current health"));
    assert_eq!(hp.order(), 2.0);

    assert_eq!(descriptor.member("speed_squared").unwrap().display_name(), "Speed Squared");
    assert!(!descriptor.member("speed_squared").unwrap().can_write());
    assert_eq!(descriptor.member("jump").unwrap().display_name(), "Jump!");
    assert!(descriptor.member("cache").is_none());
    assert!(!descriptor.member("nickname").unwrap().is_public());
}

#[test]
fn members_read_and_write_through_the_descriptor() {
    let descriptor = type_cache().get::<Hero>();
    let mut hero = Hero {
        speed: 3.0,
        nickname: "Bob".into(),
        ..Default::default()
    };
    let mut references = Vec::new();
    let mut refs = ListReferenceOperator::new(&mut references);

    let mass = descriptor.member("mass").unwrap();
    mass.write(hero.as_any_mut(), Value::Float(80.0), &mut refs).unwrap();
    assert_eq!(hero.body.mass, 80.0);
    assert_eq!(mass.read(hero.as_any(), &mut refs).unwrap(), Value::Float(80.0));

    let speed_squared = descriptor.member("speed_squared").unwrap();
    assert_eq!(speed_squared.read(hero.as_any(), &mut refs).unwrap(), Value::Float(9.0));

    let title = descriptor.member("title").unwrap();
    assert_eq!(title.read(hero.as_any(), &mut refs).unwrap(), Value::Text("Sir Bob".into()));
    title.write(hero.as_any_mut(), Value::Text("Sir Tom".into()), &mut refs).unwrap();
    assert_eq!(hero.nickname, "Tom");

    descriptor.member("jump").unwrap().invoke(hero.as_any_mut()).unwrap();
    descriptor.member("jump").unwrap().invoke(hero.as_any_mut()).unwrap();
    assert_eq!(hero.jumps, 2);

    let wrong = descriptor.member("hp").unwrap().write(&mut 5u8, Value::Int(1), &mut refs);
    assert!(matches!(wrong, Err(InspectorError::WrongOwner { .. })));
}

#[test]
fn overrides_keep_the_inherited_slot() {
    let descriptor = type_cache().get::<HeavyBody>();
    assert_eq!(names(&descriptor, &ALL_MEMBERS), ["kind", "mass"]);
    assert_eq!(descriptor.member("mass").unwrap().display_name(), "Weight");

    let mut heavy = HeavyBody::default();
    let mut references = Vec::new();
    let mut refs = ListReferenceOperator::new(&mut references);
    descriptor
        .member("mass")
        .unwrap()
        .write(heavy.as_any_mut(), Value::Float(2.0), &mut refs)
        .unwrap();
    assert_eq!(heavy.mass, 2.0);
    assert_eq!(heavy.body.mass, 0.0);
}

#[test]
fn types_are_constructible_by_name() {
    let hero = type_cache().create_instance_by_name("Hero").unwrap();
    assert!(hero.as_any().is::<Hero>());
    assert_eq!(hero.reflected_type_name(), "Hero");

    let portal_descriptor = type_cache().get_by_name("Portal").unwrap();
    assert!(!portal_descriptor.has_default_constructor());
    let portal = portal_descriptor.create_instance().unwrap();
    assert_eq!(portal.as_any().downcast_ref::<Portal>().map(|p| p.open), Some(false));

    assert!(matches!(
        type_cache().create_instance_by_name("Dragon"),
        Err(InspectorError::UnknownType(name)) if name == "Dragon"
    ));
}

#[test]
fn descriptors_are_shared() {
    let first = type_cache().get::<Body>();
    let second = type_cache().get::<Body>();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(first.type_name(), std::any::type_name::<Body>());
}
