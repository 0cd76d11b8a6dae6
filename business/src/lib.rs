pub mod application {
    pub mod notification {
        pub mod queue;
    }
    pub mod product {
        pub mod form;
        pub mod id_availability;
        pub mod list;
        pub mod messages;
        pub mod search;
    }
}

pub mod domain {
    pub mod errors;
    pub mod logger;
    pub mod notification {
        pub mod model;
    }
    pub mod product {
        pub mod errors;
        pub mod model;
        pub mod repository;
        pub mod seed;
        pub mod services;
        pub mod validation;
    }
    pub mod shared {
        pub mod dates;
        pub mod value_objects;
    }
}
