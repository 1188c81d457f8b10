//! 阿里云 DnsProvider 实现

use async_trait::async_trait;

use crate::credentials::AccessCredential;
use crate::error::Result;
use crate::pagination::collect_pages;
use crate::providers::common::{collect_per_zone, full_record_name, merge_visibility_classes};
use crate::traits::{DnsProvider, ErrorContext};
use crate::types::{Account, Domain, DomainType, Record, RecordStatus};
use crate::utils::datetime::{self, TimeFormat};

use super::types::{
    AlidnsDomain, AlidnsRecord, DescribeDomainRecordsResponse, DescribeDomainsResponse,
    DescribeZoneRecordsResponse, DescribeZonesResponse, DomainRecordsParams, PageParams, PvtzRecord,
    PvtzZone, ZoneRecordsParams,
};
use super::{AliyunProvider, RECORD_PAGE_SIZE, ZONE_PAGE_SIZE};

/// Alidns `CreateTime`, e.g. `2015-12-12T09:23Z`.
const PUBLIC_CREATE_TIME_FORMATS: &[TimeFormat] = &[TimeFormat::Pattern("%Y-%m-%dT%H:%MZ")];

/// PrivateZone `CreateTime` has been observed in all of these layouts.
const PRIVATE_CREATE_TIME_FORMATS: &[TimeFormat] = &[
    TimeFormat::Pattern("%Y-%m-%dT%H:%M:%SZ"),
    TimeFormat::Pattern("%Y-%m-%dT%H:%M:%S%.3fZ"),
    TimeFormat::Pattern("%Y-%m-%d %H:%M:%S"),
    TimeFormat::Rfc3339,
];

/// Status reported for every zone; neither API exposes one that matters here.
const ZONE_STATUS: &str = "normal";

impl AliyunProvider {
    async fn public_zones(&self, credential: &AccessCredential) -> Result<Vec<AlidnsDomain>> {
        collect_pages(ZONE_PAGE_SIZE, |page| async move {
            let response: DescribeDomainsResponse = self
                .client
                .call(
                    credential,
                    &self.alidns,
                    "DescribeDomains",
                    &PageParams {
                        page_number: page,
                        page_size: ZONE_PAGE_SIZE,
                    },
                    ErrorContext::default(),
                )
                .await?;
            Ok(response.domains.map(|w| w.domain).unwrap_or_default())
        })
        .await
    }

    async fn private_zones(&self, credential: &AccessCredential) -> Result<Vec<PvtzZone>> {
        collect_pages(ZONE_PAGE_SIZE, |page| async move {
            let response: DescribeZonesResponse = self
                .client
                .call(
                    credential,
                    &self.pvtz,
                    "DescribeZones",
                    &PageParams {
                        page_number: page,
                        page_size: ZONE_PAGE_SIZE,
                    },
                    ErrorContext::default(),
                )
                .await?;
            Ok(response.zones.map(|w| w.zone).unwrap_or_default())
        })
        .await
    }

    async fn public_zone_records(
        &self,
        credential: &AccessCredential,
        domain_name: &str,
    ) -> Result<Vec<AlidnsRecord>> {
        collect_pages(RECORD_PAGE_SIZE, |page| async move {
            let response: DescribeDomainRecordsResponse = self
                .client
                .call(
                    credential,
                    &self.alidns,
                    "DescribeDomainRecords",
                    &DomainRecordsParams {
                        domain_name,
                        page_number: page,
                        page_size: RECORD_PAGE_SIZE,
                    },
                    ErrorContext::domain(domain_name),
                )
                .await?;
            Ok(response.domain_records.map(|w| w.record).unwrap_or_default())
        })
        .await
    }

    async fn private_zone_records(
        &self,
        credential: &AccessCredential,
        zone_id: &str,
    ) -> Result<Vec<PvtzRecord>> {
        collect_pages(ZONE_PAGE_SIZE, |page| async move {
            let response: DescribeZoneRecordsResponse = self
                .client
                .call(
                    credential,
                    &self.pvtz,
                    "DescribeZoneRecords",
                    &ZoneRecordsParams {
                        zone_id,
                        page_number: page,
                        page_size: ZONE_PAGE_SIZE,
                    },
                    ErrorContext::domain(zone_id),
                )
                .await?;
            Ok(response.records.map(|w| w.record).unwrap_or_default())
        })
        .await
    }

    async fn public_records(&self, credential: &AccessCredential) -> Result<Vec<Record>> {
        let zones = self.public_zones(credential).await?;
        let account = &self.account;
        Ok(collect_per_zone(
            "aliyun",
            zones,
            |zone| zone.domain_name.clone(),
            |zone| async move {
                let records = self.public_zone_records(credential, &zone.domain_name).await?;
                Ok(records
                    .into_iter()
                    .map(|r| public_record(account, &zone.domain_name, r))
                    .collect())
            },
        )
        .await)
    }

    async fn private_records(&self, credential: &AccessCredential) -> Result<Vec<Record>> {
        let zones = self.private_zones(credential).await?;
        let account = &self.account;
        Ok(collect_per_zone(
            "aliyun",
            zones,
            |zone| format!("{} ({})", zone.zone_name, zone.zone_id),
            |zone| async move {
                let records = self.private_zone_records(credential, &zone.zone_id).await?;
                Ok(records
                    .into_iter()
                    .map(|r| private_record(account, &zone.zone_name, r))
                    .collect())
            },
        )
        .await)
    }
}

#[async_trait]
impl DnsProvider for AliyunProvider {
    fn id(&self) -> &'static str {
        "aliyun"
    }

    async fn list_domains(&self) -> Result<Vec<Domain>> {
        let credential = self.credentials.resolve().await?;
        let credential = &credential;
        let account = &self.account;

        let public = async move {
            self.public_zones(credential)
                .await
                .map(|zones| {
                    zones
                        .into_iter()
                        .map(|z| public_domain(account, z))
                        .collect::<Vec<_>>()
                })
        };
        let private = account.enable_private_dns.then_some(async move {
            self.private_zones(credential)
                .await
                .map(|zones| {
                    zones
                        .into_iter()
                        .map(|z| private_domain(account, z))
                        .collect::<Vec<_>>()
                })
        });

        merge_visibility_classes("aliyun", &account.name, "domains", public, private).await
    }

    async fn list_records(&self) -> Result<Vec<Record>> {
        let credential = self.credentials.resolve().await?;
        let private = self
            .account
            .enable_private_dns
            .then_some(self.private_records(&credential));

        merge_visibility_classes(
            "aliyun",
            &self.account.name,
            "records",
            self.public_records(&credential),
            private,
        )
        .await
    }
}

// ============ 结构转换 ============

fn public_domain(account: &Account, domain: AlidnsDomain) -> Domain {
    Domain {
        cloud_provider: account.provider.to_string(),
        cloud_name: account.name.clone(),
        domain_id: DomainType::Public.domain_id(&domain.domain_name),
        domain_type: DomainType::Public,
        domain_remark: domain.remark.unwrap_or_default(),
        domain_status: ZONE_STATUS.to_string(),
        created_date: domain
            .create_time
            .as_deref()
            .map(|t| datetime::normalize(t, PUBLIC_CREATE_TIME_FORMATS))
            .unwrap_or_default(),
        expiry_date: String::new(),
        days_until_expiry: 0,
        domain_name: domain.domain_name,
    }
}

fn private_domain(account: &Account, zone: PvtzZone) -> Domain {
    Domain {
        cloud_provider: account.provider.to_string(),
        cloud_name: account.name.clone(),
        domain_id: DomainType::Private.domain_id(&zone.zone_id),
        domain_name: zone.zone_name,
        domain_type: DomainType::Private,
        domain_remark: zone.remark.unwrap_or_default(),
        domain_status: ZONE_STATUS.to_string(),
        created_date: zone
            .create_time
            .as_deref()
            .map(|t| datetime::normalize(t, PRIVATE_CREATE_TIME_FORMATS))
            .unwrap_or_default(),
        expiry_date: String::new(),
        days_until_expiry: 0,
    }
}

fn public_record(account: &Account, domain_name: &str, record: AlidnsRecord) -> Record {
    Record {
        cloud_provider: account.provider.to_string(),
        cloud_name: account.name.clone(),
        domain_name: domain_name.to_string(),
        domain_type: DomainType::Public,
        full_record: full_record_name(&record.rr, domain_name),
        record_id: record.record_id,
        record_type: record.record_type,
        record_name: record.rr,
        record_value: record.value,
        record_ttl: record.ttl,
        record_weight: record.weight.unwrap_or_default(),
        record_status: RecordStatus::from_vendor(&record.status),
        record_remark: record.remark.unwrap_or_default(),
        update_time: record
            .update_timestamp
            .map(datetime::from_epoch)
            .unwrap_or_default(),
    }
}

/// PrivateZone records carry no update time.
fn private_record(account: &Account, zone_name: &str, record: PvtzRecord) -> Record {
    Record {
        cloud_provider: account.provider.to_string(),
        cloud_name: account.name.clone(),
        domain_name: zone_name.to_string(),
        domain_type: DomainType::Private,
        full_record: full_record_name(&record.rr, zone_name),
        record_id: record.record_id.to_string(),
        record_type: record.record_type,
        record_name: record.rr,
        record_value: record.value,
        record_ttl: record.ttl,
        record_weight: record.weight.unwrap_or_default(),
        record_status: RecordStatus::from_vendor(&record.status),
        record_remark: record.remark.unwrap_or_default(),
        update_time: String::new(),
    }
}
