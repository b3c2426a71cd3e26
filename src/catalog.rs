//! Built-in configuration options.

use crate::options::{OptionDescriptor, Registry};

/// Canonical keys referenced directly by the command layer
pub mod keys {
    pub const NO_COLOR: &str = "noColor";
    pub const OUTPUT_FORMAT: &str = "outputFormat";
    pub const DETAILED_EXIT_CODE: &str = "detailedExitCode";
}

pub const OUTPUT_FORMATS: &[&str] = &["text", "json"];

const PINGONE_REGION_CODES: &[&str] = &["AP", "AU", "CA", "EU", "NA"];
const PINGFEDERATE_AUTH_TYPES: &[&str] = &["basicAuth", "accessTokenAuth", "clientCredentialsAuth"];

/// Build the registry of every option the tool understands
pub fn builtin() -> Registry {
    let mut registry = Registry::new();

    register_general(&mut registry);
    register_export(&mut registry);
    register_request(&mut registry);
    register_pingone(&mut registry);
    register_pingfederate(&mut registry);

    registry
}

fn register_general(registry: &mut Registry) {
    registry.register(
        OptionDescriptor::bool(keys::NO_COLOR, false)
            .with_flag("no-color")
            .with_env("PINGCLI_NO_COLOR")
            .with_usage("Disable text output in color"),
    );
    registry.register(
        OptionDescriptor::enumeration(keys::OUTPUT_FORMAT, OUTPUT_FORMATS, "text")
            .with_flag("output-format")
            .with_env("PINGCLI_OUTPUT_FORMAT")
            .with_usage("Format of command output: text or json"),
    );
    registry.register(
        OptionDescriptor::bool(keys::DETAILED_EXIT_CODE, false)
            .with_flag("detailed-exitcode")
            .with_env("PINGCLI_DETAILED_EXITCODE")
            .with_usage("Exit with 2 when a command changed the configuration file"),
    );
    registry.register(
        OptionDescriptor::string_list("plugins")
            .with_usage("Plugin executables loaded at startup"),
    );
}

fn register_export(registry: &mut Registry) {
    registry.register(
        OptionDescriptor::enumeration("export.format", &["HCL"], "HCL")
            .with_flag("format")
            .with_env("PINGCLI_EXPORT_FORMAT")
            .with_usage("Export file format"),
    );
    registry.register(
        OptionDescriptor::string_list("export.services")
            .with_flag("services")
            .with_env("PINGCLI_EXPORT_SERVICES")
            .with_usage("Services to export, comma-separated"),
    );
    registry.register(
        OptionDescriptor::string("export.outputDirectory", "")
            .with_flag("output-directory")
            .with_env("PINGCLI_EXPORT_OUTPUT_DIRECTORY")
            .with_usage("Directory the generated import blocks are written to"),
    );
    registry.register(
        OptionDescriptor::bool("export.overwrite", false)
            .with_flag("overwrite")
            .with_env("PINGCLI_EXPORT_OVERWRITE")
            .with_usage("Overwrite existing files in the output directory"),
    );
    registry.register(
        OptionDescriptor::uuid("export.pingone.environmentID")
            .with_flag("pingone-export-environment-id")
            .with_env("PINGCLI_EXPORT_PINGONE_ENVIRONMENT_ID")
            .with_usage("PingOne environment to export, if different from the worker's"),
    );
}

fn register_request(registry: &mut Registry) {
    registry.register(
        OptionDescriptor::enumeration("request.service", &["pingone"], "")
            .with_flag("service")
            .with_env("PINGCLI_REQUEST_SERVICE")
            .with_usage("Service that custom API requests are sent to"),
    );
    registry.register(
        OptionDescriptor::bool("request.fail", false)
            .with_flag("fail")
            .with_usage("Return a non-zero exit code when a request fails"),
    );
    registry.register(
        OptionDescriptor::string("request.accessToken", "")
            .sensitive()
            .with_usage("Cached access token for custom API requests"),
    );
}

fn register_pingone(registry: &mut Registry) {
    registry.register(
        OptionDescriptor::enumeration("service.pingone.regionCode", PINGONE_REGION_CODES, "")
            .with_flag("pingone-region-code")
            .with_env("PINGCLI_PINGONE_REGION_CODE")
            .with_usage("Region code of the PingOne tenant"),
    );
    registry.register(
        OptionDescriptor::enumeration("service.pingone.authentication.type", &["worker"], "worker")
            .with_flag("pingone-authentication-type")
            .with_env("PINGCLI_PINGONE_AUTHENTICATION_TYPE")
            .with_usage("Authentication method for PingOne"),
    );
    registry.register(
        OptionDescriptor::uuid("service.pingone.authentication.worker.clientID")
            .with_flag("pingone-worker-client-id")
            .with_env("PINGCLI_PINGONE_WORKER_CLIENT_ID")
            .with_usage("Client ID of the PingOne worker application"),
    );
    registry.register(
        OptionDescriptor::string("service.pingone.authentication.worker.clientSecret", "")
            .sensitive()
            .with_flag("pingone-worker-client-secret")
            .with_env("PINGCLI_PINGONE_WORKER_CLIENT_SECRET")
            .with_usage("Client secret of the PingOne worker application"),
    );
    registry.register(
        OptionDescriptor::uuid("service.pingone.authentication.worker.environmentID")
            .with_flag("pingone-worker-environment-id")
            .with_env("PINGCLI_PINGONE_WORKER_ENVIRONMENT_ID")
            .with_usage("Environment that holds the PingOne worker application"),
    );
}

fn register_pingfederate(registry: &mut Registry) {
    registry.register(
        OptionDescriptor::string("service.pingFederate.httpsHost", "")
            .with_flag("pingfederate-https-host")
            .with_env("PINGCLI_PINGFEDERATE_HTTPS_HOST")
            .with_usage("PingFederate HTTPS host, e.g. https://pingfederate-admin.bxretail.org"),
    );
    registry.register(
        OptionDescriptor::string("service.pingFederate.adminAPIPath", "/pf-admin-api/v1")
            .with_flag("pingfederate-admin-api-path")
            .with_env("PINGCLI_PINGFEDERATE_ADMIN_API_PATH")
            .with_usage("Path of the PingFederate admin API"),
    );
    registry.register(
        OptionDescriptor::bool("service.pingFederate.xBypassExternalValidationHeader", false)
            .with_flag("pingfederate-x-bypass-external-validation-header")
            .with_env("PINGCLI_PINGFEDERATE_X_BYPASS_EXTERNAL_VALIDATION_HEADER")
            .with_usage("Send the X-BypassExternalValidation header on admin API calls"),
    );
    registry.register(
        OptionDescriptor::string_list("service.pingFederate.caCertificatePemFiles")
            .with_flag("pingfederate-ca-certificate-pem-files")
            .with_env("PINGCLI_PINGFEDERATE_CA_CERTIFICATE_PEM_FILES")
            .with_usage("PEM files of extra trusted CA certificates"),
    );
    registry.register(
        OptionDescriptor::bool("service.pingFederate.insecureTrustAllTLS", false)
            .with_flag("pingfederate-insecure-trust-all-tls")
            .with_env("PINGCLI_PINGFEDERATE_INSECURE_TRUST_ALL_TLS")
            .with_usage("Trust any TLS certificate the PingFederate host presents"),
    );
    registry.register(
        OptionDescriptor::enumeration(
            "service.pingFederate.authentication.type",
            PINGFEDERATE_AUTH_TYPES,
            "",
        )
        .with_flag("pingfederate-authentication-type")
        .with_env("PINGCLI_PINGFEDERATE_AUTHENTICATION_TYPE")
        .with_usage("Authentication method for PingFederate"),
    );
    registry.register(
        OptionDescriptor::string("service.pingFederate.authentication.basicAuth.username", "")
            .with_flag("pingfederate-username")
            .with_env("PINGCLI_PINGFEDERATE_USERNAME")
            .with_usage("PingFederate admin username"),
    );
    registry.register(
        OptionDescriptor::string("service.pingFederate.authentication.basicAuth.password", "")
            .sensitive()
            .with_flag("pingfederate-password")
            .with_env("PINGCLI_PINGFEDERATE_PASSWORD")
            .with_usage("PingFederate admin password"),
    );
    registry.register(
        OptionDescriptor::string(
            "service.pingFederate.authentication.accessTokenAuth.accessToken",
            "",
        )
        .sensitive()
        .with_flag("pingfederate-access-token")
        .with_env("PINGCLI_PINGFEDERATE_ACCESS_TOKEN")
        .with_usage("Static access token for the PingFederate admin API"),
    );
    registry.register(
        OptionDescriptor::string(
            "service.pingFederate.authentication.clientCredentialsAuth.clientID",
            "",
        )
        .with_flag("pingfederate-client-id")
        .with_env("PINGCLI_PINGFEDERATE_CLIENT_ID")
        .with_usage("OAuth client ID for the client credentials grant"),
    );
    registry.register(
        OptionDescriptor::string(
            "service.pingFederate.authentication.clientCredentialsAuth.clientSecret",
            "",
        )
        .sensitive()
        .with_flag("pingfederate-client-secret")
        .with_env("PINGCLI_PINGFEDERATE_CLIENT_SECRET")
        .with_usage("OAuth client secret for the client credentials grant"),
    );
    registry.register(
        OptionDescriptor::string(
            "service.pingFederate.authentication.clientCredentialsAuth.tokenURL",
            "",
        )
        .with_flag("pingfederate-token-url")
        .with_env("PINGCLI_PINGFEDERATE_TOKEN_URL")
        .with_usage("Token endpoint for the client credentials grant"),
    );
    registry.register(
        OptionDescriptor::string_list(
            "service.pingFederate.authentication.clientCredentialsAuth.scopes",
        )
        .with_flag("pingfederate-scopes")
        .with_env("PINGCLI_PINGFEDERATE_SCOPES")
        .with_usage("Scopes requested with the client credentials grant"),
    );
}
