pub mod shared {
    pub mod core {
        pub mod clock;
        pub mod primitives;
    }
    pub mod infrastructure {
        pub mod local_store;
    }
}

pub mod modules {
    pub mod history {
        pub mod core {
            pub mod errors;
            pub mod settings;
            pub mod snapshot;
            pub mod staleness;
            pub mod storage_key;
            pub mod timestamps;
        }
        pub mod use_cases {
            pub mod track_reads {
                pub mod in_flight;
                pub mod tracker;
            }
            pub mod record_read {
                pub mod handler;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
            pub mod lookup_read_timestamps {
                pub mod handler;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod inbound {
                pub mod session;
            }
            pub mod outbound {
                pub mod read_log;
                pub mod read_log_in_memory;
                pub mod read_service;
                pub mod read_service_http;
                pub mod read_service_in_memory;
            }
        }
    }
}

pub mod shell;
